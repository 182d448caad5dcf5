/*!
 * Tests for language utility functions
 */

use clipdeck::language_utils::{
    column_label, get_language_name, normalize_to_part1_or_part2t, validate_language_code,
};

#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("TR").is_ok());
    assert!(validate_language_code("deu").is_ok());
    assert!(validate_language_code("fre").is_ok());
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_normalize_withThreeLetterCode_shouldPreferTwoLetterForm() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t("tr").unwrap(), "tr");
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("tur").unwrap(), "Turkish");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_column_label_shouldUppercaseNormalizedCode() {
    assert_eq!(column_label("en"), "EN");
    assert_eq!(column_label("tur"), "TR");
    // Unknown codes are passed through
    assert_eq!(column_label("xx"), "XX");
}
