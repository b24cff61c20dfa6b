// Stat derivation: ordered fallback chains over a player's stat lines.
//
// Each displayed stat walks its chain (primary column, alternate column,
// formula over other columns) and takes the first usable value, else 0.0.

use serde::Serialize;
use tracing::debug;

use crate::stats::{PlayerRecord, Section, StatLine};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where a displayed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source")]
pub enum Origin {
    /// Read straight from the named column.
    Column(&'static str),
    /// Computed by the labelled formula.
    Derived(&'static str),
    /// Nothing usable; the value is zero.
    Default,
}

/// A resolved display value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    pub value: f64,
    pub origin: Origin,
}

impl Resolved {
    pub const DEFAULT: Resolved = Resolved {
        value: 0.0,
        origin: Origin::Default,
    };

    pub fn is_derived(&self) -> bool {
        matches!(self.origin, Origin::Derived(_))
    }
}

/// One candidate in a fallback chain.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Column(&'static str),
    Formula {
        label: &'static str,
        compute: fn(&StatLine) -> Option<f64>,
    },
}

/// The ordered sources for one stat within one section.
#[derive(Debug)]
pub struct FallbackChain {
    pub stat: &'static str,
    pub section: Section,
    pub sources: &'static [Source],
}

impl FallbackChain {
    /// Walk the chain and return the first usable value, else zero.
    pub fn resolve(&self, line: &StatLine) -> Resolved {
        for (i, source) in self.sources.iter().enumerate() {
            let (value, origin) = match *source {
                Source::Column(key) => (line.get(key), Origin::Column(key)),
                Source::Formula { label, compute } => (compute(line), Origin::Derived(label)),
            };
            if let Some(value) = value.filter(|v| v.is_finite()) {
                if i > 0 {
                    debug!(stat = self.stat, ?origin, "primary source unusable, fell back");
                }
                return Resolved { value, origin };
            }
        }
        debug!(stat = self.stat, "no usable source, defaulting to zero");
        Resolved::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert innings in baseball notation (12.1 = 12 and one third) to true
/// innings. Values whose fraction is not .0/.1/.2 are taken as plain decimals.
pub fn innings_from_notation(ip: f64) -> f64 {
    let whole = ip.trunc();
    let tenths = ((ip - whole) * 10.0).round();
    if tenths == 0.0 {
        whole
    } else if tenths == 1.0 {
        whole + 1.0 / 3.0
    } else if tenths == 2.0 {
        whole + 2.0 / 3.0
    } else {
        ip
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

fn assists(line: &StatLine) -> Option<f64> {
    line.get("Assists").or_else(|| line.get("A"))
}

fn errors(line: &StatLine) -> Option<f64> {
    line.get("Errors").or_else(|| line.get("E"))
}

fn innings(line: &StatLine) -> Option<f64> {
    line.get("IP").map(innings_from_notation)
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

fn avg_from_hits(l: &StatLine) -> Option<f64> {
    ratio(l.get("H")?, l.get("AB")?)
}

fn slg_from_ops(l: &StatLine) -> Option<f64> {
    Some(l.get("OPS")? - l.get("OBP")?)
}

fn ops_from_parts(l: &StatLine) -> Option<f64> {
    Some(l.get("OBP")? + l.get("SLG")?)
}

fn xbh_from_hits(l: &StatLine) -> Option<f64> {
    Some(l.get("2B")? + l.get("3B")? + l.get("HR")?)
}

fn sb_pct_from_attempts(l: &StatLine) -> Option<f64> {
    let sb = l.get("SB")?;
    ratio(sb, sb + l.get("CS")?).map(|r| r * 100.0)
}

fn whip_from_baserunners(l: &StatLine) -> Option<f64> {
    ratio(l.get("BB")? + l.get("H")?, innings(l)?)
}

fn walks_per_inning(l: &StatLine) -> Option<f64> {
    ratio(l.get("BB")?, innings(l)?)
}

fn total_chances(l: &StatLine) -> Option<f64> {
    Some(l.get("PO")? + assists(l)? + errors(l)?)
}

fn fielding_pct(l: &StatLine) -> Option<f64> {
    let handled = l.get("PO")? + assists(l)?;
    ratio(handled, handled + errors(l)?)
}

// ---------------------------------------------------------------------------
// Chain table
// ---------------------------------------------------------------------------

macro_rules! chain {
    ($section:ident, $stat:literal, [$($source:expr),* $(,)?]) => {
        FallbackChain {
            stat: $stat,
            section: Section::$section,
            sources: &[$($source),*],
        }
    };
}

const fn col(key: &'static str) -> Source {
    Source::Column(key)
}

const fn formula(label: &'static str, compute: fn(&StatLine) -> Option<f64>) -> Source {
    Source::Formula { label, compute }
}

/// Every stat the card can show.
pub static CHAINS: &[FallbackChain] = &[
    chain!(Batting, "AVG", [col("AVG"), formula("H / AB", avg_from_hits)]),
    chain!(Batting, "OBP", [col("OBP")]),
    chain!(Batting, "SLG", [col("SLG"), formula("OPS - OBP", slg_from_ops)]),
    chain!(Batting, "OPS", [col("OPS"), formula("OBP + SLG", ops_from_parts)]),
    chain!(Batting, "HR", [col("HR")]),
    chain!(Batting, "RBI", [col("RBI")]),
    chain!(Batting, "R", [col("R")]),
    chain!(Batting, "SB", [col("SB")]),
    chain!(Batting, "XBH", [col("XBH"), formula("2B + 3B + HR", xbh_from_hits)]),
    chain!(Batting, "SB%", [col("SB%"), formula("100 * SB / (SB + CS)", sb_pct_from_attempts)]),
    chain!(Pitching, "ERA", [col("ERA"), col("FIP")]),
    chain!(Pitching, "WHIP", [col("WHIP"), formula("(BB + H) / IP", whip_from_baserunners)]),
    chain!(Pitching, "IP", [col("IP")]),
    chain!(Pitching, "GP", [col("GP")]),
    chain!(Pitching, "FIP", [col("FIP")]),
    chain!(Pitching, "BB/INN", [col("BB/INN"), formula("BB / IP", walks_per_inning)]),
    chain!(Fielding, "TC", [col("TC"), formula("PO + A + E", total_chances)]),
    chain!(Fielding, "FPCT", [col("FPCT"), formula("(PO + A) / (PO + A + E)", fielding_pct)]),
    chain!(Fielding, "Assists", [col("Assists"), col("A")]),
    chain!(Fielding, "Errors", [col("Errors"), col("E")]),
];

/// Look up the chain for a stat in a section.
pub fn chain_for(section: Section, stat: &str) -> Option<&'static FallbackChain> {
    CHAINS
        .iter()
        .find(|c| c.section == section && c.stat == stat)
}

/// Resolve one stat for a player. Stats without a chain are read as a plain
/// column.
pub fn resolve(player: &PlayerRecord, section: Section, stat: &'static str) -> Resolved {
    let line = player.line(section);
    match chain_for(section, stat) {
        Some(chain) => chain.resolve(line),
        None => line
            .get(stat)
            .map(|value| Resolved {
                value,
                origin: Origin::Column(stat),
            })
            .unwrap_or(Resolved::DEFAULT),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
