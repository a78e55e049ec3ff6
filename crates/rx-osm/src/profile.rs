//! Routing profiles: which OSM ways are usable, at what cost multiplier, in
//! which direction, and which turn restrictions apply.
//!
//! # Access tags
//!
//! `Profile::access` lists tag keys from least to most specific, e.g.
//! `["access", "vehicle", "motor_vehicle", "motorcar"]`.  The most specific
//! key present on a way decides, so `access=no` + `bus=yes` opens a way to
//! buses and `access=yes` + `motorcar=no` closes it to cars.  Every key except
//! `access` itself also names a *mode*, used to look up `oneway:<mode>`,
//! `restriction:<mode>` and `except=…`.
//!
//! # Penalties
//!
//! Edge cost is the great-circle length multiplied by the penalty of the
//! first matching `(key, value)` entry.  Ways matching no entry are not
//! routable.  Penalties below `1.0` would make the A* heuristic
//! inadmissible and are rejected by [`Profile::validate`].

use crate::error::{OsmLoadingError, OsmResult};
use crate::feature::Tags;

// ── Penalty / Profile ─────────────────────────────────────────────────────────

/// Cost multiplier for ways tagged `key=value`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Penalty {
    pub key:     String,
    pub value:   String,
    pub penalty: f32,
}

impl Penalty {
    pub fn new(key: impl Into<String>, value: impl Into<String>, penalty: f32) -> Self {
        Self { key: key.into(), value: value.into(), penalty }
    }
}

/// A fully specified routing profile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    /// `"foot"` switches on pedestrian one-way and restriction rules.
    pub name: String,
    pub penalties: Vec<Penalty>,
    /// Access tag keys, least specific first.
    pub access: Vec<String>,
    /// Skip ways tagged `motorroad=yes`.
    pub disallow_motorroad: bool,
    /// Ignore all turn-restriction relations.
    pub disable_restrictions: bool,
}

/// Travel direction allowed along a way's node order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Both,
    Forward,
    Backward,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RestrictionKind {
    /// `no_*`: the from → to manoeuvre is forbidden.
    Prohibitory,
    /// `only_*`: from → to is the only allowed manoeuvre.
    Mandatory,
}

impl Profile {
    /// Reject penalties that are NaN, infinite, or below `1.0`.
    pub fn validate(&self) -> OsmResult<()> {
        if let Some(p) = self.penalties.iter().find(|p| !p.penalty.is_finite() || p.penalty < 1.0) {
            return Err(OsmLoadingError::InvalidProfile(format!(
                "profile {:?}: penalty for {}={} must be finite and >= 1, got {}",
                self.name, p.key, p.value, p.penalty
            )));
        }
        Ok(())
    }

    pub fn is_foot(&self) -> bool {
        self.name == "foot"
    }

    /// Mode keys (all access keys except `access`), most specific first.
    fn modes(&self) -> impl Iterator<Item = &str> {
        self.access.iter().rev().map(String::as_str).filter(|&k| k != "access")
    }

    /// Cost multiplier for a way, or `None` if the profile cannot use it.
    pub(crate) fn way_penalty(&self, tags: &Tags) -> Option<f32> {
        if !self.is_allowed(tags) {
            return None;
        }
        if self.disallow_motorroad && tag(tags, "motorroad") == Some("yes") {
            return None;
        }
        self.penalties
            .iter()
            .find(|p| tag(tags, &p.key) == Some(p.value.as_str()))
            .map(|p| p.penalty)
    }

    /// The most specific access tag present decides; no tag means allowed.
    pub(crate) fn is_allowed(&self, tags: &Tags) -> bool {
        match self.access.iter().rev().find_map(|k| tag(tags, k)) {
            Some(value) => !matches!(value, "no" | "private" | "false"),
            None => true,
        }
    }

    pub(crate) fn way_direction(&self, tags: &Tags) -> Direction {
        if self.is_foot() {
            return foot_direction(tags);
        }

        let explicit = self
            .modes()
            .find_map(|mode| tag(tags, &format!("oneway:{mode}")))
            .or_else(|| tag(tags, "oneway"));
        if let Some(value) = explicit {
            return parse_oneway(value);
        }

        let implied = matches!(tag(tags, "junction"), Some("roundabout" | "circular"))
            || matches!(tag(tags, "highway"), Some("motorway" | "motorway_link"));
        if implied { Direction::Forward } else { Direction::Both }
    }

    /// Kind of a relation as a turn restriction for this profile, or `None`
    /// if it does not apply.
    pub(crate) fn restriction_kind(&self, tags: &Tags) -> Option<RestrictionKind> {
        if self.disable_restrictions || tag(tags, "type") != Some("restriction") {
            return None;
        }

        let value = if self.is_foot() {
            tag(tags, "restriction:foot")?
        } else {
            self.modes()
                .find_map(|mode| tag(tags, &format!("restriction:{mode}")))
                .or_else(|| tag(tags, "restriction"))?
        };

        if let Some(except) = tag(tags, "except") {
            if except.split(';').map(str::trim).any(|e| self.modes().any(|m| m == e)) {
                return None;
            }
        }

        if value.starts_with("no_") {
            Some(RestrictionKind::Prohibitory)
        } else if value.starts_with("only_") {
            Some(RestrictionKind::Mandatory)
        } else {
            None
        }
    }
}

#[inline]
fn tag<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str)
}

fn parse_oneway(value: &str) -> Direction {
    match value {
        "yes" | "true" | "1" => Direction::Forward,
        "-1" | "reverse" => Direction::Backward,
        _ => Direction::Both,
    }
}

/// Pedestrians ignore the general `oneway` tag except on ways built for
/// them, where it describes walking direction.
fn foot_direction(tags: &Tags) -> Direction {
    if let Some(value) = tag(tags, "oneway:foot") {
        return parse_oneway(value);
    }
    let pedestrian_way = matches!(tag(tags, "highway"), Some("footway" | "path" | "steps" | "platform"))
        || tag(tags, "public_transport") == Some("platform")
        || tag(tags, "railway") == Some("platform");
    match tag(tags, "oneway") {
        Some(value) if pedestrian_way => parse_oneway(value),
        _ => Direction::Both,
    }
}

// ── Predefined profiles ───────────────────────────────────────────────────────

/// Built-in profiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PredefinedProfile {
    Car,
    Bus,
    Bicycle,
    Foot,
    Railway,
    Tram,
    Subway,
}

type PenaltyRow = (&'static str, &'static str, f32);

const CAR_PENALTIES: &[PenaltyRow] = &[
    ("highway", "motorway", 1.0),
    ("highway", "motorway_link", 1.0),
    ("highway", "trunk", 2.0),
    ("highway", "trunk_link", 2.0),
    ("highway", "primary", 5.0),
    ("highway", "primary_link", 5.0),
    ("highway", "secondary", 6.5),
    ("highway", "secondary_link", 6.5),
    ("highway", "tertiary", 10.0),
    ("highway", "tertiary_link", 10.0),
    ("highway", "unclassified", 10.0),
    ("highway", "minor", 10.0),
    ("highway", "residential", 15.0),
    ("highway", "living_street", 20.0),
    ("highway", "track", 20.0),
    ("highway", "service", 20.0),
];

const BUS_PENALTIES: &[PenaltyRow] = &[
    ("highway", "motorway", 1.0),
    ("highway", "motorway_link", 1.0),
    ("highway", "trunk", 1.0),
    ("highway", "trunk_link", 1.0),
    ("highway", "primary", 1.1),
    ("highway", "primary_link", 1.1),
    ("highway", "secondary", 1.15),
    ("highway", "secondary_link", 1.15),
    ("highway", "tertiary", 1.15),
    ("highway", "tertiary_link", 1.15),
    ("highway", "unclassified", 1.5),
    ("highway", "minor", 1.5),
    ("highway", "residential", 2.5),
    ("highway", "living_street", 2.5),
    ("highway", "track", 5.0),
    ("highway", "service", 5.0),
];

const BICYCLE_PENALTIES: &[PenaltyRow] = &[
    ("highway", "trunk", 50.0),
    ("highway", "trunk_link", 50.0),
    ("highway", "primary", 10.0),
    ("highway", "primary_link", 10.0),
    ("highway", "secondary", 3.0),
    ("highway", "secondary_link", 3.0),
    ("highway", "tertiary", 2.5),
    ("highway", "tertiary_link", 2.5),
    ("highway", "unclassified", 2.5),
    ("highway", "minor", 2.5),
    ("highway", "cycleway", 1.0),
    ("highway", "residential", 1.0),
    ("highway", "living_street", 1.5),
    ("highway", "track", 2.0),
    ("highway", "service", 2.0),
    ("highway", "bridleway", 3.0),
    ("highway", "footway", 3.0),
    ("highway", "steps", 5.0),
    ("highway", "path", 2.0),
];

const FOOT_PENALTIES: &[PenaltyRow] = &[
    ("highway", "trunk", 4.0),
    ("highway", "trunk_link", 4.0),
    ("highway", "primary", 2.0),
    ("highway", "primary_link", 2.0),
    ("highway", "secondary", 1.3),
    ("highway", "secondary_link", 1.3),
    ("highway", "tertiary", 1.2),
    ("highway", "tertiary_link", 1.2),
    ("highway", "unclassified", 1.2),
    ("highway", "minor", 1.2),
    ("highway", "residential", 1.2),
    ("highway", "living_street", 1.2),
    ("highway", "track", 1.2),
    ("highway", "service", 1.2),
    ("highway", "bridleway", 1.2),
    ("highway", "footway", 1.05),
    ("highway", "path", 1.05),
    ("highway", "steps", 1.15),
    ("highway", "pedestrian", 1.0),
    ("highway", "platform", 1.1),
    ("railway", "platform", 1.1),
    ("public_transport", "platform", 1.1),
];

const RAILWAY_PENALTIES: &[PenaltyRow] = &[
    ("railway", "rail", 1.0),
    ("railway", "light_rail", 1.0),
    ("railway", "subway", 1.0),
    ("railway", "narrow_gauge", 1.0),
];

const TRAM_PENALTIES: &[PenaltyRow] = &[("railway", "tram", 1.0), ("railway", "light_rail", 1.0)];

const SUBWAY_PENALTIES: &[PenaltyRow] = &[("railway", "subway", 1.0)];

impl PredefinedProfile {
    pub const ALL: [PredefinedProfile; 7] = [
        Self::Car,
        Self::Bus,
        Self::Bicycle,
        Self::Foot,
        Self::Railway,
        Self::Tram,
        Self::Subway,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bus => "bus",
            Self::Bicycle => "bicycle",
            Self::Foot => "foot",
            Self::Railway => "railway",
            Self::Tram => "tram",
            Self::Subway => "subway",
        }
    }

    fn penalties(self) -> &'static [PenaltyRow] {
        match self {
            Self::Car => CAR_PENALTIES,
            Self::Bus => BUS_PENALTIES,
            Self::Bicycle => BICYCLE_PENALTIES,
            Self::Foot => FOOT_PENALTIES,
            Self::Railway => RAILWAY_PENALTIES,
            Self::Tram => TRAM_PENALTIES,
            Self::Subway => SUBWAY_PENALTIES,
        }
    }

    fn access(self) -> &'static [&'static str] {
        match self {
            Self::Car => &["access", "vehicle", "motor_vehicle", "motorcar"],
            Self::Bus => &["access", "vehicle", "motor_vehicle", "psv", "bus", "routing:ztm"],
            Self::Bicycle => &["access", "vehicle", "bicycle"],
            Self::Foot => &["access", "foot"],
            Self::Railway => &["access", "train"],
            Self::Tram => &["access", "tram"],
            Self::Subway => &["access", "subway"],
        }
    }

    /// Expand into a full [`Profile`].
    pub fn to_profile(self) -> Profile {
        Profile {
            name: self.name().to_string(),
            penalties: self
                .penalties()
                .iter()
                .map(|&(k, v, p)| Penalty::new(k, v, p))
                .collect(),
            access: self.access().iter().map(|s| s.to_string()).collect(),
            disallow_motorroad: matches!(self, Self::Bicycle | Self::Foot),
            disable_restrictions: false,
        }
    }
}

// ── OsmProfile ────────────────────────────────────────────────────────────────

/// Profile selection for ingestion: a built-in one or a custom [`Profile`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OsmProfile {
    Predefined(PredefinedProfile),
    Custom(Profile),
}

impl OsmProfile {
    /// The concrete profile.  Validation happens separately.
    pub fn resolve(&self) -> Profile {
        match self {
            Self::Predefined(p) => p.to_profile(),
            Self::Custom(p) => p.clone(),
        }
    }
}

impl From<PredefinedProfile> for OsmProfile {
    fn from(p: PredefinedProfile) -> Self {
        Self::Predefined(p)
    }
}

impl From<Profile> for OsmProfile {
    fn from(p: Profile) -> Self {
        Self::Custom(p)
    }
}
