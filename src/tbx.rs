// SPDX-License-Identifier: MIT
//!
//! Extract bilingual term pairs from TBX
//!

use crate::error::{Error, Result};
use crate::xml::{Element, XmlError};

/// TBX-Basic default namespace
pub const TBX_NS: &str = "urn:iso:std:iso:30042:ed-2";

/// `xml:lang` attribute in Clark notation
const XML_LANG: &str = "{http://www.w3.org/XML/1998/namespace}lang";

/// Source and target language codes, compared verbatim with `xml:lang`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new<S: Into<String>, T: Into<String>>(source: S, target: T) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("en", "es")
    }
}

/// One line of the output glossary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlossaryRow {
    pub source_term: String,
    pub target_term: String,
}

/// Tag names used for lookups, decided once from the root element
struct TbxTags {
    term_entry: String,
    lang_set: String,
    tig: String,
    term: String,
}

impl TbxTags {
    fn for_root(root: &Element) -> Self {
        // Some exports declare the TBX namespace, others omit it
        let prefix = if root.is_namespaced() {
            format!("{{{}}}", TBX_NS)
        } else {
            String::new()
        };

        Self {
            term_entry: format!("{}termEntry", prefix),
            lang_set: format!("{}langSet", prefix),
            tig: format!("{}tig", prefix),
            term: format!("{}term", prefix),
        }
    }
}

/// Read TBX file and extract term pairs for `langs`
pub fn read_tbx_file<P: AsRef<std::path::Path>>(
    tbx_path: P,
    langs: &LanguagePair,
) -> Result<Vec<GlossaryRow>> {
    let tbx_path = tbx_path.as_ref();
    let buf = std::fs::read(tbx_path).map_err(|e| Error::input(tbx_path, e))?;
    log::debug!("Read {} bytes from {:?}", buf.len(), tbx_path);

    let root = Element::parse(&buf).map_err(|e| Error::MalformedXml {
        path: tbx_path.to_path_buf(),
        source: e,
    })?;
    Ok(extract_rows(&root, langs))
}

/// Parse TBX text and extract term pairs for `langs`
pub fn parse_tbx_str(
    tbx_text: &str,
    langs: &LanguagePair,
) -> std::result::Result<Vec<GlossaryRow>, XmlError> {
    let root = Element::parse(tbx_text.as_bytes())?;
    Ok(extract_rows(&root, langs))
}

/// Extract term pairs from a parsed TBX document, in document order
///
/// An entry yields a row only if it has a term for both languages.
/// Other entries are skipped without error.
pub fn extract_rows(root: &Element, langs: &LanguagePair) -> Vec<GlossaryRow> {
    let tags = TbxTags::for_root(root);
    let entries = root.descendants_named(&tags.term_entry);

    let rows = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let terms = entry_terms(entry, &tags);
            let source = terms.get(langs.source.as_str()).copied().flatten();
            let target = terms.get(langs.target.as_str()).copied().flatten();
            match (source, target) {
                (Some(source), Some(target)) => Some(GlossaryRow {
                    source_term: source.to_string(),
                    target_term: target.to_string(),
                }),
                _ => {
                    log::trace!(
                        "termEntry #{} skipped, no {}/{} pair",
                        idx,
                        langs.source,
                        langs.target
                    );
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "{} of {} termEntry elements have {}/{} terms",
        rows.len(),
        entries.len(),
        langs.source,
        langs.target
    );
    rows
}

/// Map language code => first tig/term text of one termEntry
///
/// A langSet without term text maps to `None`. When a language repeats,
/// the last langSet wins.
fn entry_terms<'a>(
    entry: &'a Element,
    tags: &'a TbxTags,
) -> std::collections::HashMap<&'a str, Option<&'a str>> {
    let mut terms = std::collections::HashMap::new();

    for lang_set in entry.children_named(&tags.lang_set) {
        let lang = match lang_set.attr(XML_LANG) {
            Some(lang) if !lang.is_empty() => lang,
            _ => continue,
        };
        let term = lang_set
            .children_named(&tags.tig)
            .find_map(|tig| tig.children_named(&tags.term).next())
            .and_then(|term| term.text());

        if terms.insert(lang, term).is_some() {
            log::debug!("termEntry repeats langSet {:?}, using the last one", lang);
        }
    }

    terms
}
