use std::fmt;

/// The content databases the site reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentFile {
    Glossary,
    Formulas,
    Fats,
    Fragrances,
    Colourants,
    SoapPerformance,
    SkinCare,
    Equipment,
    Processes,
    Sources,
}

impl ContentFile {
    pub const ALL: [ContentFile; 10] = [
        Self::Glossary,
        Self::Formulas,
        Self::Fats,
        Self::Fragrances,
        Self::Colourants,
        Self::SoapPerformance,
        Self::SkinCare,
        Self::Equipment,
        Self::Processes,
        Self::Sources,
    ];

    /// Path of the file relative to the content root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Glossary => "glossary.json",
            Self::Formulas => "formulas.json",
            Self::Fats => "fats.json",
            Self::Fragrances => "fragrances.json",
            Self::Colourants => "colourants.json",
            Self::SoapPerformance => "soap-performance.json",
            Self::SkinCare => "skin-care.json",
            Self::Equipment => "equipment.json",
            Self::Processes => "processes.json",
            Self::Sources => "sources.json",
        }
    }

    /// What the file holds, as used in "Failed to load ..." messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Glossary => "glossary",
            Self::Formulas => "formulas",
            Self::Fats => "fats",
            Self::Fragrances => "fragrances",
            Self::Colourants => "colourants",
            Self::SoapPerformance => "soap performance data",
            Self::SkinCare => "skin care data",
            Self::Equipment => "equipment",
            Self::Processes => "processes",
            Self::Sources => "sources",
        }
    }

    /// Whether the file holds ingredient records rather than articles.
    #[must_use]
    pub const fn is_ingredient_db(self) -> bool {
        matches!(
            self,
            Self::Fats | Self::Fragrances | Self::Colourants | Self::SoapPerformance | Self::SkinCare
        )
    }

    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.file_name() == name)
    }
}

impl fmt::Display for ContentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_unique_and_reversible() {
        for file in ContentFile::ALL {
            assert_eq!(ContentFile::from_file_name(file.file_name()), Some(file));
        }
        assert_eq!(ContentFile::from_file_name("recipes.json"), None);
    }
}
