use scraper::{ElementRef, Html};

use crate::recipe::CompiledStep;

/// Walk `steps` from the document root and concatenate the text of whatever
/// is selected at the end. An empty selection yields an empty string.
pub(crate) fn evaluate(doc: &Html, steps: &[CompiledStep]) -> String {
    let mut selection: Vec<ElementRef<'_>> = vec![doc.root_element()];

    for step in steps {
        selection = match step {
            CompiledStep::Css(selector) => {
                let mut out = Vec::new();
                for el in &selection {
                    for found in el.select(selector) {
                        push_unique(&mut out, found);
                    }
                }
                out
            }
            CompiledStep::Contains(needle) => selection
                .into_iter()
                .filter(|el| el.text().collect::<String>().contains(needle.as_str()))
                .collect(),
            CompiledStep::Next => {
                let mut out = Vec::new();
                for el in &selection {
                    if let Some(next) = el.next_siblings().find_map(ElementRef::wrap) {
                        push_unique(&mut out, next);
                    }
                }
                out
            }
        };
    }

    selection.iter().flat_map(|el| el.text()).collect()
}

// Nested scopes can reach the same element twice.
fn push_unique<'a>(out: &mut Vec<ElementRef<'a>>, el: ElementRef<'a>) {
    if !out.iter().any(|seen| seen.id() == el.id()) {
        out.push(el);
    }
}
