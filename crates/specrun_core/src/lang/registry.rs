//! Shareable metadata for `specrun_core::lang` registries.
//!
//! The `specrun_core::lang` module is a set of **registry-first** vocabularies. This submodule provides the small,
//! dependency-free metadata types reused across them.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for reporting and docs; enforcement (e.g. matching raised errors) lives with the callers.

/// Represent a small example snippet for documentation.
///
/// ## Notes
/// - `code` is the example body, in the dynamic language the corpus describes.
/// - `note` is an optional short explanation (one or two sentences).
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

/// Shared metadata shape for “registry-first” vocabulary items.
///
/// Registries that need extra per-item data (e.g. an exception's parent class) wrap this struct in an
/// “extension” info type.
///
/// ## Notes
/// - `description` is intentionally mandatory to keep reports and docs consistent.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub description: &'static str,
    pub examples: &'static [Example],
}
