//! Sum-of-products covers, and their derivation from truth tables.
//!
//! A [`Cover`] is a list of [`Cube`]s over the fanins of a node. Each cube position holds
//! `0` (the fanin must be false), `1` (the fanin must be true) or `-` (don't care), position `i`
//! standing for fanin `i`.
//!
//! A node of a logic network is described to the CNF encoder by a pair of covers: the on-set
//! cover (minterms where the node is true) and the off-set cover (where it is false). They are
//! computed from the truth table by [`derive_covers`], using prime implicants.

use std::{
    collections::{BTreeSet, HashSet},
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;

/// Error returned when a cover or a truth table is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverError {
    /// A cube does not have one position per fanin.
    #[error("cube of width {got} in a cover over {expected} fanins")]
    WidthMismatch { expected: usize, got: usize },

    /// A truth table does not have 2^n entries.
    #[error("truth table of {got} entries, expected {expected} for {fanins} fanins")]
    TruthTableSize {
        fanins: usize,
        expected: usize,
        got: usize,
    },

    /// Too many fanins for a truth table (or a cover check) to be enumerated.
    #[error("{0} fanins is too many to enumerate the local function")]
    TooManyFanins(usize),

    /// Unknown character in a cube, only `0`, `1` and `-` are allowed.
    #[error("invalid cube character '{0}', expected '0', '1' or '-'")]
    BadCubeChar(char),

    /// A minterm belongs to both the on-set and the off-set covers.
    #[error("minterm {0:#b} is in both the on-set and the off-set")]
    InBothCovers(usize),

    /// A minterm belongs to neither the on-set nor the off-set cover.
    #[error("minterm {0:#b} is in neither the on-set nor the off-set")]
    InNoCover(usize),
}

/// Largest number of fanins whose minterms are enumerated.
pub const MAX_ENUMERATED_FANINS: usize = 20;

/// One position of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeLit {
    Zero,
    One,
    DontCare,
}

impl CubeLit {
    /// Returns true if the fanin value is allowed by this position.
    pub fn accepts(self, value: bool) -> bool {
        match self {
            CubeLit::Zero => !value,
            CubeLit::One => value,
            CubeLit::DontCare => true,
        }
    }
}

impl TryFrom<char> for CubeLit {
    type Error = CoverError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(CubeLit::Zero),
            '1' => Ok(CubeLit::One),
            '-' => Ok(CubeLit::DontCare),
            _ => Err(CoverError::BadCubeChar(c)),
        }
    }
}

impl Display for CubeLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            CubeLit::Zero => '0',
            CubeLit::One => '1',
            CubeLit::DontCare => '-',
        };
        write!(f, "{}", c)
    }
}

/// A product term: the conjunction of its fixed positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cube(Vec<CubeLit>);

impl Cube {
    pub fn new(lits: Vec<CubeLit>) -> Self {
        Cube(lits)
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn lits(&self) -> &[CubeLit] {
        &self.0
    }

    /// Returns true if the cube holds for the given fanin values.
    pub fn contains(&self, values: &[bool]) -> bool {
        self.0.len() == values.len()
            && self.0.iter().zip(values).all(|(lit, &v)| lit.accepts(v))
    }

    /// Same as [`Cube::contains`], fanin `i` being bit `i` of `minterm`.
    pub fn contains_minterm(&self, minterm: usize) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(i, lit)| lit.accepts(minterm & (1 << i) != 0))
    }

    /// Builds the cube of an implicant: `mask` bits are don't cares, other positions take
    /// the value of the corresponding `bits` bit.
    fn from_implicant(width: usize, bits: usize, mask: usize) -> Self {
        Cube(
            (0..width)
                .map(|i| {
                    if mask & (1 << i) != 0 {
                        CubeLit::DontCare
                    } else if bits & (1 << i) != 0 {
                        CubeLit::One
                    } else {
                        CubeLit::Zero
                    }
                })
                .collect(),
        )
    }
}

impl FromStr for Cube {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(CubeLit::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Cube)
    }
}

impl Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.0 {
            write!(f, "{}", lit)?;
        }
        Ok(())
    }
}

/// A sum of products over a fixed number of fanins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    width: usize,
    cubes: Vec<Cube>,
}

impl Cover {
    /// An empty cover (constant false) over `width` fanins.
    pub fn new(width: usize) -> Self {
        Cover {
            width,
            cubes: Vec::new(),
        }
    }

    /// Builds a cover, checking every cube has the right width.
    pub fn from_cubes(width: usize, cubes: Vec<Cube>) -> Result<Self, CoverError> {
        let mut cover = Cover::new(width);
        for cube in cubes {
            cover.push(cube)?;
        }
        Ok(cover)
    }

    /// Parses a cover from its cubes, such as `["1-0", "01-"]`.
    ///
    /// ```rust
    /// use satmiter::logic::cover::Cover;
    /// let cover = Cover::parse(3, &["1-0", "01-"]).unwrap();
    /// assert!(cover.contains(&[true, true, false]));
    /// assert!(!cover.contains(&[true, true, true]));
    /// assert!(Cover::parse(2, &["1-0"]).is_err());
    /// ```
    pub fn parse(width: usize, cubes: &[&str]) -> Result<Self, CoverError> {
        let cubes = cubes
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Cube>, _>>()?;
        Cover::from_cubes(width, cubes)
    }

    pub fn push(&mut self, cube: Cube) -> Result<(), CoverError> {
        if cube.width() != self.width {
            return Err(CoverError::WidthMismatch {
                expected: self.width,
                got: cube.width(),
            });
        }
        self.cubes.push(cube);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn contains(&self, values: &[bool]) -> bool {
        self.cubes.iter().any(|cube| cube.contains(values))
    }

    pub fn contains_minterm(&self, minterm: usize) -> bool {
        self.cubes.iter().any(|cube| cube.contains_minterm(minterm))
    }
}

/// The local function of a node, as seen by the cover-based encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCovers {
    /// The node does not depend on its fanins.
    Constant(bool),
    /// On-set and off-set covers, partitioning the fanin space.
    Covers { on: Cover, off: Cover },
}

/// Number of fanins of a truth table, checking its size.
pub fn truth_table_width(truth: &[bool]) -> Result<usize, CoverError> {
    let width = truth.len().max(1).trailing_zeros() as usize;
    if width > MAX_ENUMERATED_FANINS {
        return Err(CoverError::TooManyFanins(width));
    }
    if truth.len() != 1 << width {
        return Err(CoverError::TruthTableSize {
            fanins: width,
            expected: 1 << width,
            got: truth.len(),
        });
    }
    Ok(width)
}

/// Checks that `on` and `off` partition the fanin space.
pub fn check_partition(on: &Cover, off: &Cover) -> Result<(), CoverError> {
    if on.width() != off.width() {
        return Err(CoverError::WidthMismatch {
            expected: on.width(),
            got: off.width(),
        });
    }
    if on.width() > MAX_ENUMERATED_FANINS {
        return Err(CoverError::TooManyFanins(on.width()));
    }
    for minterm in 0..(1usize << on.width()) {
        match (on.contains_minterm(minterm), off.contains_minterm(minterm)) {
            (true, true) => return Err(CoverError::InBothCovers(minterm)),
            (false, false) => return Err(CoverError::InNoCover(minterm)),
            _ => (),
        }
    }
    Ok(())
}

/// Derives the on-set and off-set covers of a truth table (entry `m` is the value of the node
/// when fanin `i` takes bit `i` of `m`).
///
/// Covers are made of prime implicants: all of them with `all_primes`, otherwise an
/// irredundant subset.
///
/// ```rust
/// use satmiter::logic::cover::{derive_covers, Cover, LocalCovers};
/// // a & b
/// let covers = derive_covers(&[false, false, false, true], false).unwrap();
/// assert_eq!(
///     covers,
///     LocalCovers::Covers {
///         on: Cover::parse(2, &["11"]).unwrap(),
///         off: Cover::parse(2, &["-0", "0-"]).unwrap(),
///     }
/// );
/// ```
pub fn derive_covers(truth: &[bool], all_primes: bool) -> Result<LocalCovers, CoverError> {
    let width = truth_table_width(truth)?;

    let (on, off): (Vec<usize>, Vec<usize>) = (0..truth.len()).partition(|&m| truth[m]);
    if on.is_empty() {
        return Ok(LocalCovers::Constant(false));
    }
    if off.is_empty() {
        return Ok(LocalCovers::Constant(true));
    }

    Ok(LocalCovers::Covers {
        on: cover_of(width, &on, all_primes),
        off: cover_of(width, &off, all_primes),
    })
}

/// Cover of a set of minterms made of prime implicants.
fn cover_of(width: usize, minterms: &[usize], all_primes: bool) -> Cover {
    let primes = prime_implicants(minterms);
    let chosen = if all_primes {
        primes
    } else {
        irredundant(&primes, minterms)
    };
    Cover {
        width,
        cubes: chosen
            .into_iter()
            .map(|(bits, mask)| Cube::from_implicant(width, bits, mask))
            .collect(),
    }
}

/// An implicant: `mask` bits are don't cares, `bits` gives the value of the other positions
/// (and is zero on the mask).
type Implicant = (usize, usize);

fn implicant_covers((bits, mask): Implicant, minterm: usize) -> bool {
    minterm & !mask == bits
}

/// Quine-McCluskey: merges implicants differing in exactly one fixed position, until no
/// merge is possible. Implicants never merged are prime.
fn prime_implicants(minterms: &[usize]) -> Vec<Implicant> {
    let mut primes = BTreeSet::new();
    let mut current: BTreeSet<Implicant> = minterms.iter().map(|&m| (m, 0)).collect();

    while !current.is_empty() {
        let mut next = BTreeSet::new();
        let mut merged = HashSet::new();
        let level: Vec<Implicant> = current.iter().copied().collect();
        for (k, &(bits, mask)) in level.iter().enumerate() {
            for &(other_bits, other_mask) in &level[k + 1..] {
                let diff = bits ^ other_bits;
                if mask == other_mask && diff.count_ones() == 1 {
                    next.insert((bits & !diff, mask | diff));
                    merged.insert((bits, mask));
                    merged.insert((other_bits, other_mask));
                }
            }
        }
        primes.extend(level.into_iter().filter(|imp| !merged.contains(imp)));
        current = next;
    }
    primes.into_iter().collect()
}

/// Picks primes covering every minterm: essential primes, then greedily the prime covering
/// most uncovered minterms, then drops primes made redundant by later picks.
fn irredundant(primes: &[Implicant], minterms: &[usize]) -> Vec<Implicant> {
    let mut chosen: Vec<Implicant> = Vec::new();

    for &m in minterms {
        let mut covering = primes.iter().filter(|&&p| implicant_covers(p, m));
        if let (Some(&p), None) = (covering.next(), covering.next()) {
            if !chosen.contains(&p) {
                chosen.push(p);
            }
        }
    }

    let mut uncovered: Vec<usize> = minterms
        .iter()
        .copied()
        .filter(|&m| !chosen.iter().any(|&p| implicant_covers(p, m)))
        .collect();
    while !uncovered.is_empty() {
        let best = primes
            .iter()
            .copied()
            .max_by_key(|&p| {
                let gain = uncovered.iter().filter(|&&m| implicant_covers(p, m)).count();
                // Earlier primes win ties
                (gain, std::cmp::Reverse(p))
            })
            .filter(|&p| uncovered.iter().any(|&m| implicant_covers(p, m)));
        let Some(best) = best else {
            unreachable!("every minterm is covered by at least one prime");
        };
        chosen.push(best);
        uncovered.retain(|&m| !implicant_covers(best, m));
    }

    let mut k = chosen.len();
    while k > 0 {
        k -= 1;
        let p = chosen[k];
        let redundant = minterms
            .iter()
            .filter(|&&m| implicant_covers(p, m))
            .all(|&m| {
                chosen
                    .iter()
                    .enumerate()
                    .any(|(j, &q)| j != k && implicant_covers(q, m))
            });
        if redundant {
            chosen.remove(k);
        }
    }
    chosen
}
