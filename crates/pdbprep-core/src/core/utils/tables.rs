use phf::{Map, phf_map};
use std::borrow::Cow;

/// Lines containing any of these tags are dropped before anything else happens.
pub static DISALLOWED_TAGS: &[&str] = &["REMAR", "CTERB", "CTERA", "NTERA", "NTERB", "CONECT"];

/// Literal substitutions applied to every surviving line, in order.
/// Each source and replacement have the same length.
#[rustfmt::skip]
pub static RENAME_RULES: &[(&str, &str)] = &[
    // --- Legacy histidine protonation names ---
    ("HSD", "HIS"), ("HSE", "HIS"), ("HID", "HIS"), ("HIE", "HIS"),
    // --- Water ---
    ("WAT ", "TIP3"),
    // --- Malformed occupancy written by some exporters ---
    (" 0.00969", " 0.00   "),
];

/// Formal charges a monoatomic ion may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonCharges {
    Single(i8),
    Either(i8, i8),
}

impl IonCharges {
    /// The canonical charge, if there is exactly one.
    pub fn canonical(self) -> Option<i8> {
        match self {
            IonCharges::Single(q) => Some(q),
            IonCharges::Either(..) => None,
        }
    }

    /// Sign shared by every permitted charge (`1` or `-1`).
    pub fn sign(self) -> i8 {
        match self {
            IonCharges::Single(q) | IonCharges::Either(q, _) => q.signum(),
        }
    }
}

#[rustfmt::skip]
static ION_CHARGES: Map<&'static str, IonCharges> = phf_map! {
    // --- Alkali metals ---
    "LI" => IonCharges::Single(1), "NA" => IonCharges::Single(1), "K" => IonCharges::Single(1),
    "RB" => IonCharges::Single(1), "CS" => IonCharges::Single(1),

    // --- Halides ---
    "F" => IonCharges::Single(-1), "CL" => IonCharges::Single(-1),
    "BR" => IonCharges::Single(-1), "I" => IonCharges::Single(-1),

    // --- Alkaline earth and group 12 ---
    "MG" => IonCharges::Single(2), "CA" => IonCharges::Single(2), "SR" => IonCharges::Single(2),
    "BA" => IonCharges::Single(2), "ZN" => IonCharges::Single(2), "CD" => IonCharges::Single(2),
    "HG" => IonCharges::Single(2),

    // --- Transition metals with more than one common oxidation state ---
    "NI" => IonCharges::Either(2, 3), "CU" => IonCharges::Either(1, 2),
    "FE" => IonCharges::Either(2, 3), "CO" => IonCharges::Either(2, 3),
    "MN" => IonCharges::Either(2, 3), "CR" => IonCharges::Either(2, 3),
    "V" => IonCharges::Either(2, 3),

    "AL" => IonCharges::Single(3),
};

pub fn contains_disallowed_tag(line: &str) -> bool {
    DISALLOWED_TAGS.iter().any(|tag| line.contains(tag))
}

/// Applies [`RENAME_RULES`] in a single ordered pass.
pub fn apply_renames(line: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(line);
    for (from, to) in RENAME_RULES {
        if result.contains(from) {
            result = Cow::Owned(result.replace(from, to));
        }
    }
    result
}

pub fn ion_charges(symbol: &str) -> Option<IonCharges> {
    ION_CHARGES.get(symbol).copied()
}
