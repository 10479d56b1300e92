//! Dictionary merger: compose N module documents into one complete dictionary.
//!
//! The first document supplies the base structure and the `Meta` section;
//! every later document contributes the contents of its `Facts` section,
//! appended in input order. A `FactDictionaryModule` root is rewritten to
//! `FactDictionary`. Fact entries are moved verbatim -- attributes, nesting
//! and escaping round-trip untouched, and duplicate `path` values are
//! appended rather than deduplicated.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::MergeError;
use crate::{DICTIONARY_ROOT_TAG, FACTS_TAG, MODULE_ROOT_TAG};

/// Merge one or more fact dictionary documents into a single complete
/// dictionary, serialized back to a document string.
///
/// Pure transformation: no I/O, no shared state, safe to call repeatedly
/// and concurrently on independent inputs.
pub fn merge(docs: &[&str]) -> Result<String, MergeError> {
    let base = *docs.first().ok_or(MergeError::Empty)?;

    // Facts contributed by every document after the first, in input order.
    let mut appended: Vec<Event<'static>> = Vec::new();
    for (index, doc) in docs.iter().enumerate().skip(1) {
        facts_content(doc, index, &mut appended)?;
    }

    let mut reader = Reader::from_str(base);
    let mut writer = Writer::new(Vec::new());

    let mut depth = 0usize;
    let mut root_seen = false;
    let mut root_renamed = false;
    let mut in_facts = false;
    let mut facts_rel = 0usize;
    let mut facts_done = false;

    loop {
        let ev = reader.read_event().map_err(|e| MergeError::Malformed {
            index: 0,
            detail: e.to_string(),
        })?;
        match ev {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                if !root_seen {
                    root_seen = true;
                    if e.name().as_ref() == MODULE_ROOT_TAG.as_bytes() {
                        root_renamed = true;
                        let renamed = rename(&e, DICTIONARY_ROOT_TAG, 0)?;
                        emit(&mut writer, Event::Start(renamed))?;
                        continue;
                    }
                }
                if in_facts {
                    facts_rel += 1;
                } else if !facts_done && e.name().as_ref() == FACTS_TAG.as_bytes() {
                    in_facts = true;
                    facts_rel = 0;
                }
                emit(&mut writer, Event::Start(e))?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if in_facts {
                    if facts_rel == 0 {
                        // Closing the base Facts section: splice in every
                        // appended entry before the end tag.
                        for ev in &appended {
                            emit(&mut writer, ev.clone())?;
                        }
                        in_facts = false;
                        facts_done = true;
                    } else {
                        facts_rel -= 1;
                    }
                }
                if root_renamed && depth == 0 && e.name().as_ref() == MODULE_ROOT_TAG.as_bytes() {
                    emit(&mut writer, Event::End(BytesEnd::new(DICTIONARY_ROOT_TAG)))?;
                } else {
                    emit(&mut writer, Event::End(e))?;
                }
            }
            Event::Empty(e) => {
                if !root_seen {
                    root_seen = true;
                    if e.name().as_ref() == MODULE_ROOT_TAG.as_bytes() {
                        let renamed = rename(&e, DICTIONARY_ROOT_TAG, 0)?;
                        emit(&mut writer, Event::Empty(renamed))?;
                        continue;
                    }
                }
                if !in_facts && !facts_done && e.name().as_ref() == FACTS_TAG.as_bytes() {
                    // `<Facts/>` in the base document: expand it so appended
                    // entries have somewhere to land.
                    facts_done = true;
                    if appended.is_empty() {
                        emit(&mut writer, Event::Empty(e))?;
                    } else {
                        let start = rename(&e, FACTS_TAG, 0)?;
                        emit(&mut writer, Event::Start(start))?;
                        for ev in &appended {
                            emit(&mut writer, ev.clone())?;
                        }
                        emit(&mut writer, Event::End(BytesEnd::new(FACTS_TAG)))?;
                    }
                } else {
                    emit(&mut writer, Event::Empty(e))?;
                }
            }
            other => emit(&mut writer, other)?,
        }
    }

    if depth != 0 {
        return Err(MergeError::Malformed {
            index: 0,
            detail: "unexpected end of document".to_string(),
        });
    }
    if !facts_done && !appended.is_empty() {
        return Err(MergeError::NoFactsSection);
    }

    String::from_utf8(writer.into_inner()).map_err(|e| MergeError::Serialize {
        detail: e.to_string(),
    })
}

/// The `path` attribute of every direct child of the first `Facts` section,
/// in document order. Entries without a `path` attribute yield an empty
/// string.
pub fn fact_paths(doc: &str) -> Result<Vec<String>, MergeError> {
    let mut reader = Reader::from_str(doc);
    let mut paths = Vec::new();

    let mut depth = 0usize;
    let mut in_facts = false;
    let mut facts_rel = 0usize;
    let mut facts_done = false;

    loop {
        match reader.read_event().map_err(|e| MergeError::Malformed {
            index: 0,
            detail: e.to_string(),
        })? {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                if in_facts {
                    if facts_rel == 0 {
                        paths.push(path_attribute(&e, 0)?);
                    }
                    facts_rel += 1;
                } else if !facts_done && e.name().as_ref() == FACTS_TAG.as_bytes() {
                    in_facts = true;
                    facts_rel = 0;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if in_facts {
                    if facts_rel == 0 {
                        in_facts = false;
                        facts_done = true;
                    } else {
                        facts_rel -= 1;
                    }
                }
            }
            Event::Empty(e) => {
                if in_facts && facts_rel == 0 {
                    paths.push(path_attribute(&e, 0)?);
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(MergeError::Malformed {
            index: 0,
            detail: "unexpected end of document".to_string(),
        });
    }
    Ok(paths)
}

// ──────────────────────────────────────────────
// Internals
// ──────────────────────────────────────────────

/// Collect the entire content of `doc`'s first `Facts` section -- element
/// children with their full subtrees, plus the text between them so the
/// source formatting survives.
fn facts_content(
    doc: &str,
    index: usize,
    out: &mut Vec<Event<'static>>,
) -> Result<(), MergeError> {
    let mut reader = Reader::from_str(doc);

    let mut depth = 0usize;
    let mut in_facts = false;
    let mut facts_rel = 0usize;
    let mut facts_done = false;

    loop {
        let ev = reader.read_event().map_err(|e| MergeError::Malformed {
            index,
            detail: e.to_string(),
        })?;
        match ev {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                if in_facts {
                    facts_rel += 1;
                    out.push(Event::Start(e.into_owned()));
                } else if !facts_done && e.name().as_ref() == FACTS_TAG.as_bytes() {
                    in_facts = true;
                    facts_rel = 0;
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if in_facts {
                    if facts_rel == 0 {
                        in_facts = false;
                        facts_done = true;
                    } else {
                        facts_rel -= 1;
                        out.push(Event::End(e.into_owned()));
                    }
                }
            }
            other => {
                if in_facts {
                    out.push(other.into_owned());
                }
            }
        }
    }

    if depth != 0 {
        return Err(MergeError::Malformed {
            index,
            detail: "unexpected end of document".to_string(),
        });
    }
    Ok(())
}

/// Rebuild a start tag under a new name, carrying every attribute over.
fn rename(
    e: &BytesStart<'_>,
    name: &'static str,
    index: usize,
) -> Result<BytesStart<'static>, MergeError> {
    let mut start = BytesStart::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| MergeError::Malformed {
            index,
            detail: err.to_string(),
        })?;
        start.push_attribute(attr);
    }
    Ok(start)
}

/// Read the `path` attribute of a fact entry, empty if absent.
fn path_attribute(e: &BytesStart<'_>, index: usize) -> Result<String, MergeError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| MergeError::Malformed {
            index,
            detail: err.to_string(),
        })?;
        if attr.key.as_ref() == b"path" {
            let value = attr.unescape_value().map_err(|err| MergeError::Malformed {
                index,
                detail: err.to_string(),
            })?;
            return Ok(value.into_owned());
        }
    }
    Ok(String::new())
}

fn emit(writer: &mut Writer<Vec<u8>>, ev: Event<'_>) -> Result<(), MergeError> {
    writer.write_event(ev).map_err(|e| MergeError::Serialize {
        detail: e.to_string(),
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE_A: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FactDictionaryModule>
  <Meta>
    <Version>1.0.0</Version>
  </Meta>
  <Facts>
    <Fact path="/fact1">
      <Name>Fact 1</Name>
    </Fact>
  </Facts>
</FactDictionaryModule>"#;

    const MODULE_B: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FactDictionaryModule>
  <Meta>
    <Version>2.0.0</Version>
  </Meta>
  <Facts>
    <Fact path="/fact2">
      <Name>Fact 2</Name>
    </Fact>
  </Facts>
</FactDictionaryModule>"#;

    const MODULE_C: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FactDictionaryModule>
  <Facts>
    <Fact path="/fact3">
      <Name>Fact 3</Name>
    </Fact>
  </Facts>
</FactDictionaryModule>"#;

    #[test]
    fn combines_two_modules() {
        let combined = merge(&[MODULE_A, MODULE_B]).unwrap();
        assert!(combined.contains("Fact 1"));
        assert!(combined.contains("Fact 2"));
        assert_eq!(fact_paths(&combined).unwrap(), vec!["/fact1", "/fact2"]);
    }

    #[test]
    fn combines_three_modules_in_order() {
        let combined = merge(&[MODULE_A, MODULE_B, MODULE_C]).unwrap();
        assert_eq!(
            fact_paths(&combined).unwrap(),
            vec!["/fact1", "/fact2", "/fact3"]
        );
    }

    #[test]
    fn meta_taken_from_first_document_only() {
        let combined = merge(&[MODULE_A, MODULE_B]).unwrap();
        assert!(combined.contains("1.0.0"));
        assert!(!combined.contains("2.0.0"));
    }

    #[test]
    fn module_root_rewritten_to_dictionary() {
        let combined = merge(&[MODULE_A]).unwrap();
        assert!(combined.contains("<FactDictionary>"));
        assert!(combined.contains("</FactDictionary>"));
        assert!(!combined.contains(MODULE_ROOT_TAG));
    }

    #[test]
    fn dictionary_root_left_untouched() {
        let doc = r#"<FactDictionary>
  <Facts>
    <Fact path="/fact1"/>
  </Facts>
</FactDictionary>"#;
        let combined = merge(&[doc, MODULE_B]).unwrap();
        assert!(combined.starts_with("<FactDictionary>"));
        assert_eq!(fact_paths(&combined).unwrap(), vec!["/fact1", "/fact2"]);
    }

    #[test]
    fn fact_count_is_sum_including_duplicates() {
        let left = r#"<FactDictionaryModule>
  <Facts>
    <Fact path="/a"/>
    <Fact path="/b"/>
  </Facts>
</FactDictionaryModule>"#;
        let right = r#"<FactDictionaryModule>
  <Facts>
    <Fact path="/a"/>
  </Facts>
</FactDictionaryModule>"#;
        let combined = merge(&[left, right]).unwrap();
        assert_eq!(fact_paths(&combined).unwrap(), vec!["/a", "/b", "/a"]);
    }

    #[test]
    fn three_entry_and_two_entry_modules_yield_five_facts() {
        let first = r#"<FactDictionaryModule>
  <Meta><Version>v1.0</Version></Meta>
  <Facts>
    <Fact path="/a"/>
    <Fact path="/b"/>
    <Fact path="/c"/>
  </Facts>
</FactDictionaryModule>"#;
        let second = r#"<FactDictionaryModule>
  <Meta><Version>v2.0</Version></Meta>
  <Facts>
    <Fact path="/d"/>
    <Fact path="/e"/>
  </Facts>
</FactDictionaryModule>"#;
        let combined = merge(&[first, second]).unwrap();
        assert_eq!(fact_paths(&combined).unwrap().len(), 5);
        assert!(combined.contains("v1.0"));
        assert!(!combined.contains("v2.0"));
    }

    #[test]
    fn merge_is_associative_in_effect() {
        let left_pair = merge(&[MODULE_A, MODULE_B]).unwrap();
        let pairwise = merge(&[left_pair.as_str(), MODULE_C]).unwrap();
        let flat = merge(&[MODULE_A, MODULE_B, MODULE_C]).unwrap();
        assert_eq!(fact_paths(&pairwise).unwrap(), fact_paths(&flat).unwrap());
    }

    #[test]
    fn nested_payload_and_attributes_preserved() {
        let doc = r#"<FactDictionaryModule>
  <Facts>
    <Fact path="/test" id="123">
      <Name>Test Fact</Name>
      <Derived>
        <Dollar>100</Dollar>
      </Derived>
    </Fact>
  </Facts>
</FactDictionaryModule>"#;
        let combined = merge(&[MODULE_C, doc]).unwrap();
        assert!(combined.contains(r#"path="/test""#));
        assert!(combined.contains(r#"id="123""#));
        assert!(combined.contains("<Dollar>100</Dollar>"));
    }

    #[test]
    fn malformed_document_reports_its_index() {
        let truncated = r#"<FactDictionaryModule><Facts><Fact path="/x">"#;
        match merge(&[MODULE_A, truncated]) {
            Err(MergeError::Malformed { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn empty_facts_element_in_base_is_expanded() {
        let base = r#"<FactDictionaryModule><Meta/><Facts/></FactDictionaryModule>"#;
        let combined = merge(&[base, MODULE_B]).unwrap();
        assert_eq!(fact_paths(&combined).unwrap(), vec!["/fact2"]);
    }

    #[test]
    fn base_without_facts_section_errors() {
        let base = r#"<FactDictionaryModule><Meta/></FactDictionaryModule>"#;
        assert_eq!(merge(&[base, MODULE_B]), Err(MergeError::NoFactsSection));
    }

    #[test]
    fn base_without_facts_is_fine_when_nothing_appends() {
        let base = r#"<FactDictionaryModule><Meta/></FactDictionaryModule>"#;
        let combined = merge(&[base]).unwrap();
        assert!(combined.contains("<FactDictionary>"));
    }

    #[test]
    fn no_documents_is_an_error() {
        assert_eq!(merge(&[]), Err(MergeError::Empty));
    }

    #[test]
    fn fact_paths_skips_nested_facts_sections() {
        let doc = r#"<FactDictionary>
  <Facts>
    <Fact path="/outer">
      <Facts><Fact path="/inner"/></Facts>
    </Fact>
  </Facts>
</FactDictionary>"#;
        assert_eq!(fact_paths(doc).unwrap(), vec!["/outer"]);
    }
}
