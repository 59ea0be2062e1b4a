// 📚 Static Content - Portfolio, equipment and policy pages
// Display-only text; nothing here affects pricing.

pub struct Section {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

/// Label/value pairs, values may list several items
pub struct GearRow {
    pub label: &'static str,
    pub values: &'static [&'static str],
}

pub const PORTFOLIO_INTRO: &str = "Selected credits and career history.";

pub const PORTFOLIO: &[Section] = &[
    Section {
        title: "Major Projects",
        items: &[
            "THEBLACKLABEL - ALLDAY PROJECT mixing & mastering (ongoing)",
            "ForTheMore mixing & mastering",
        ],
    },
    Section {
        title: "Influencer & Creator",
        items: &[
            "Mixing & mastering for a YouTuber with 260K subscribers",
            "Mixing & mastering for a VTuber with 190K subscribers",
            "Mixing & mastering for a VTuber with 30K subscribers",
            "Mixing & mastering for a VTuber with 10K subscribers",
            "Hundreds of commissions for small creators and individuals",
        ],
    },
    Section {
        title: "Broadcast & Media",
        items: &[
            "High School Rapper 3: finalist (3rd place) mixing & mastering",
            "High School Rapper 2: team contestant mixing & mastering",
            "Street karaoke show grand-prize winner mixing & mastering",
        ],
    },
    Section {
        title: "Awards & Career",
        items: &[
            "ROK Navy official CM song contest: Chief of Naval Operations award",
            "PA live engineer during ROK Navy service",
            "KBS N (Voice On The Street) participant",
        ],
    },
];

pub const SYSTEM_INTRO: &str = "Studio environment and equipment.";

pub const SYSTEM: &[GearRow] = &[
    GearRow {
        label: "DAW",
        values: &["Ableton Live 12 Suite", "Studio Pro 8", "Cubase 15 Pro"],
    },
    GearRow {
        label: "Interface",
        values: &["RME BabyFace Pro FS"],
    },
    GearRow {
        label: "Monitoring",
        values: &[
            "Genelec 8030c",
            "Yamaha HS8PM",
            "Austrian Audio HI-X60",
            "Audio Technica ATH-M50X",
            "Sony MDR-7506",
        ],
    },
    GearRow {
        label: "Plugins",
        values: &[
            "Antares, Arturia, Audio Ease, Celemony, Curve Audio",
            "FabFilter, Flux, IK Multimedia, iZotope, Slate Digital",
            "Sonarworks, Soundtoys, SSL, TBTECH, Waves",
            "Universal Audio (UADx), Valhalla DSP",
        ],
    },
];

pub const GUIDE_INTRO: &str = "Work process and file guidelines.";

pub const GUIDE: &[Section] = &[
    Section {
        title: "IMPORTANT NOTICE",
        items: &[
            "The client bears all responsibility for issues caused by not reading these policies.",
            "Legal responsibility for policy or copyright violations lies with the uploader.",
            "No secondary editing of delivered work (cutting, splicing or any other form).",
            "Quality depends on the recording quality and vocal performance supplied.",
            "Unworkable recordings may lead to a re-recording request or a declined job.",
        ],
    },
    Section {
        title: "WORK PROCESS",
        items: &[
            "Pitch/timing correction is an option, not part of the base service.",
            "Project files are deleted as soon as completion is confirmed.",
            "All work carries the THE MILLI MIX signature sound.",
            "Final delivery: 48kHz / 24bit / WAV.",
        ],
    },
    Section {
        title: "FILE SUBMISSION",
        items: &[
            "Vocal: 48kHz / 24bit / Mono / WAV",
            "Instrumental: 48kHz / 24bit / Stereo / WAV",
            "Check file format and quality before submitting.",
            "Submit main vocal files organised per track.",
            "MP3/M4A recordings are accepted but may lose quality.",
            "Vocal files must be free of noise and overlapping takes.",
            "Vocal files must be synced to the full length of the instrumental.",
        ],
    },
    Section {
        title: "TIMELINE & COPYRIGHT",
        items: &[
            "Work starts the day after prepayment, once recordings are reviewed.",
            "Solo/duet: 3 to 14 days. Group songs: timeline by agreement.",
            "Work may be used as a portfolio sample unless the exclusion option (50,000) is chosen.",
            "Credit is mandatory even when excluded from the portfolio: Mix Mastered By MILLI",
            "Removing the signature sound costs 50,000; unauthorised removal is a copyright violation.",
        ],
    },
];

/// Refund share by the stage work has reached
pub const REFUND_POLICY: &[(&str, &str)] = &[
    ("Editing started", "50% refund"),
    ("Mixing started", "30% refund"),
    ("Mastering started", "10% refund"),
    ("Mastering finished", "No refund"),
];

pub const REFUND_NOTE: &str =
    "Refunded jobs receive no in-progress files; commercial and non-commercial use is not allowed.";

/// Prompt shown before an estimate is exported
pub const EXPORT_CONFIRMATION: &str =
    "Have you read the work policies and file submission guide?";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_populated() {
        assert_eq!(PORTFOLIO.len(), 4);
        assert!(PORTFOLIO.iter().all(|s| !s.items.is_empty()));
        assert!(SYSTEM.iter().any(|r| r.label == "DAW"));
        assert!(GUIDE.iter().any(|s| s.title == "FILE SUBMISSION"));
    }

    #[test]
    fn test_refund_schedule_is_descending() {
        let stages: Vec<&str> = REFUND_POLICY.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(
            stages,
            vec!["Editing started", "Mixing started", "Mastering started", "Mastering finished"]
        );
        assert_eq!(REFUND_POLICY[3].1, "No refund");
    }
}
