//! Row to translation entry expansion.

use crate::models::{CellValue, HeaderLayout, KeyPath, TranslationEntry};

/// True when the row has no value in any language column.
///
/// Such rows only restate path segments (section rows) and emit nothing,
/// though they still move the path state.
pub fn is_blank_row(row: &[CellValue], layout: &HeaderLayout) -> bool {
    layout
        .languages
        .iter()
        .all(|lang| row.get(lang.column).map_or(true, CellValue::is_absent))
}

/// One entry per language, in header order, or none for a blank row.
pub fn expand_row(row: &[CellValue], path: &KeyPath, layout: &HeaderLayout) -> Vec<TranslationEntry> {
    if is_blank_row(row, layout) {
        return Vec::new();
    }

    let tag = row.first().cloned().unwrap_or_default();

    layout
        .languages
        .iter()
        .map(|lang| TranslationEntry {
            language: lang.language.clone(),
            path: path.clone(),
            tag: tag.clone(),
            value: row
                .get(lang.column)
                .map(CellValue::to_text_or_empty)
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LanguageColumn;

    fn layout() -> HeaderLayout {
        HeaderLayout {
            path_depth: 1,
            languages: vec![
                LanguageColumn { language: "en".into(), column: 2 },
                LanguageColumn { language: "fr".into(), column: 3 },
            ],
        }
    }

    #[test]
    fn test_one_entry_per_language_in_header_order() {
        let row = vec![
            CellValue::from("t1"),
            CellValue::from("greeting"),
            CellValue::from("Hello"),
            CellValue::from("Bonjour"),
        ];
        let entries = expand_row(&row, &vec!["greeting".to_string()], &layout());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].language, "en");
        assert_eq!(entries[0].value, "Hello");
        assert_eq!(entries[0].tag, CellValue::from("t1"));
        assert_eq!(entries[1].language, "fr");
        assert_eq!(entries[1].value, "Bonjour");
    }

    #[test]
    fn test_missing_translation_becomes_empty_string() {
        let row = vec![
            CellValue::Absent,
            CellValue::from("greeting"),
            CellValue::from("Hello"),
            CellValue::Absent,
        ];
        let entries = expand_row(&row, &vec!["greeting".to_string()], &layout());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value, "");
        assert!(entries[0].tag.is_absent());
    }

    #[test]
    fn test_blank_row_is_rejected() {
        let row = vec![
            CellValue::from("section"),
            CellValue::from("home"),
            CellValue::Absent,
            CellValue::Absent,
        ];

        assert!(is_blank_row(&row, &layout()));
        assert!(expand_row(&row, &vec!["home".to_string()], &layout()).is_empty());
    }

    #[test]
    fn test_no_languages_yields_nothing() {
        let layout = HeaderLayout { path_depth: 1, languages: vec![] };
        let row = vec![CellValue::Absent, CellValue::from("key")];

        assert!(expand_row(&row, &vec!["key".to_string()], &layout).is_empty());
    }

    #[test]
    fn test_non_text_values_are_rendered() {
        let row = vec![
            CellValue::Absent,
            CellValue::from("count"),
            CellValue::Number(42.0),
            CellValue::Boolean(false),
        ];
        let entries = expand_row(&row, &vec!["count".to_string()], &layout());

        assert_eq!(entries[0].value, "42");
        assert_eq!(entries[1].value, "false");
    }
}
