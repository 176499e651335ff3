/// Maximum plausible amplicon / tandem-repeat span in bases. Primer hit
/// pairs further apart than this never form a candidate product.
pub const MAX_AMPLICON_LEN: i64 = 1200;

/// Allele code meaning "absent or indeterminate".
pub const SENTINEL: &str = "99";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocusKind {
    /// Standard VNTR locus typed by amplicon size; both primers required.
    Vntr,
    /// Locus typed by counting contiguous repeat-unit copies anchored at the
    /// forward primer. The reverse primer is undetectable in a sizable
    /// fraction of isolates, so it is optional here.
    RepeatChain {
        repeat_subject: &'static str,
        repeat_bitscore: f64,
    },
    /// Binary presence/absence marker; absence of hits is a valid negative
    /// call, never a typing failure.
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusDef {
    pub name: &'static str,
    pub forward: &'static str,
    pub reverse: &'static str,
    pub bitscore: f64,
    pub kind: LocusKind,
}

/// VNTR panel in canonical profile order.
pub static VNTR_LOCI: [LocusDef; 8] = [
    LocusDef {
        name: "VNTR09_01",
        forward: "VNTR09_01_Ff",
        reverse: "VNTR09_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR61_01",
        forward: "VNTR61_01_Nf",
        reverse: "VNTR61_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR61_02",
        forward: "VNTR61_02_Vf",
        reverse: "VNTR61_02_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR67_01",
        forward: "VNTR67_01_Pf",
        reverse: "VNTR67_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR21_01",
        forward: "VNTR21_01_Vf",
        reverse: "VNTR21_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR24_01",
        forward: "VNTR24_01_Pf",
        reverse: "VNTR24_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
    LocusDef {
        name: "VNTR63_01",
        forward: "VNTR63_01_Ff",
        reverse: "VNTR63_01_r",
        bitscore: 25.0,
        kind: LocusKind::RepeatChain {
            repeat_subject: "VNTR63_01",
            repeat_bitscore: 55.0,
        },
    },
    LocusDef {
        name: "VNTR81_01",
        forward: "VNTR81_01_Nf",
        reverse: "VNTR81_01_r",
        bitscore: 30.0,
        kind: LocusKind::Vntr,
    },
];

/// Binary marker loci, reported after the profile lines.
pub static MARKER_LOCI: [LocusDef; 2] = [
    LocusDef {
        name: "MLVA_MecA",
        forward: "MLVA_MecA_Ff",
        reverse: "MLVA_MecA_r",
        bitscore: 30.0,
        kind: LocusKind::Marker,
    },
    LocusDef {
        name: "MLVA_PVL",
        forward: "MLVA_PVL_Ff",
        reverse: "MLVA_PVL_r",
        bitscore: 30.0,
        kind: LocusKind::Marker,
    },
];
