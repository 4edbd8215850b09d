//! Header-driven segmentation of resume text.
//!
//! A section header is a known synonym standing alone on a line, optionally
//! followed by a colon. Everything between two recognized headers (or between
//! a header and end of document) belongs to the first header's section.
//! Because segmentation is header-driven rather than position-driven,
//! documents in any section order come out right.
//!
//! Synonym lists are bilingual (English/Spanish) to match the uploads this
//! platform actually receives.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Languages,
    EhrSystems,
    Programs,
}

const SECTION_SYNONYMS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "objective",
            "profile",
            "about me",
            "resumen",
            "objetivo",
            "perfil",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "work history",
            "employment",
            "employment history",
            "professional experience",
            "relevant experience",
            "experiencia",
            "experiencia laboral",
            "experiencia profesional",
            "historial laboral",
            "historial de trabajo",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "education and training",
            "academic background",
            "educación",
            "educacion",
            "formación académica",
            "formacion academica",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "key skills",
            "areas of expertise",
            "competencies",
            "habilidades",
            "competencias",
            "aptitudes",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certificates",
            "licenses",
            "licenses and certifications",
            "certifications and licenses",
            "certificaciones",
            "licencias",
            "certificados",
        ],
    ),
    (
        SectionKind::Languages,
        &["languages", "language skills", "idiomas"],
    ),
    (
        SectionKind::EhrSystems,
        &[
            "ehr systems",
            "emr systems",
            "ehr experience",
            "ehr/emr systems",
            "sistemas ehr",
            "sistemas emr",
        ],
    ),
    (
        SectionKind::Programs,
        &[
            "programs",
            "software",
            "computer skills",
            "programas",
            "informática",
            "informatica",
        ],
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

/// Segmentation result: recognized sections in document order, plus the text
/// before the first header (where contact details usually live).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmented {
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Segmented {
    /// Concatenated body text of every section of `kind`, in document order.
    pub fn body(&self, kind: SectionKind) -> Option<String> {
        let bodies: Vec<&str> = self
            .sections
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.body.as_str())
            .collect();
        if bodies.is_empty() {
            None
        } else {
            Some(bodies.join("\n"))
        }
    }
}

/// Returns the section a line introduces, if it is a recognized header.
fn header_kind(line: &str) -> Option<SectionKind> {
    let trimmed = line.trim().trim_end_matches(':').trim_end();
    if trimmed.is_empty() {
        return None;
    }
    // Normalize inner whitespace so "Work  History" still matches.
    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = normalized.to_lowercase();

    SECTION_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&lowered.as_str()))
        .map(|&(kind, _)| kind)
}

/// Splits `text` into a preamble and header-delimited sections.
pub fn segment(text: &str) -> Segmented {
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(SectionKind, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(kind) = header_kind(line) {
            if let Some((prev_kind, lines)) = current.take() {
                sections.push(Section {
                    kind: prev_kind,
                    body: lines.join("\n"),
                });
            }
            current = Some((kind, Vec::new()));
        } else {
            match &mut current {
                Some((_, lines)) => lines.push(line),
                None => preamble.push(line),
            }
        }
    }

    if let Some((kind, lines)) = current {
        sections.push(Section {
            kind,
            body: lines.join("\n"),
        });
    }

    Segmented {
        preamble: preamble.join("\n"),
        sections,
    }
}
