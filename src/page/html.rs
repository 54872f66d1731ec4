//! Builds a [`Page`] from the console's rendered HTML.

use super::{Page, ResultSlot, StatusBanner, TriggerElement};
use crate::config::DomConfig;
use crate::error::{UiError, UiResult};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

fn selector(css: &str) -> UiResult<Selector> {
    Selector::parse(css).map_err(|e| UiError::Page(format!("Bad selector {:?}: {:?}", css, e)))
}

pub(crate) fn hidden_by_style(style: &str) -> bool {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .any(|(prop, value)| {
            prop.trim().eq_ignore_ascii_case("display") && value.trim().eq_ignore_ascii_case("none")
        })
}

impl Page {
    #[instrument(skip(html, dom), fields(bytes = html.len()))]
    pub fn from_html(html: &str, dom: &DomConfig) -> UiResult<Page> {
        let document = Html::parse_document(html);
        let trigger_sel = selector(&format!(".{}", dom.trigger_class))?;
        let id_sel = selector("[id]")?;

        let mut page = Page::new();

        for element in document.select(&trigger_sel) {
            let attrs = element.value();
            page.push_trigger(TriggerElement {
                customer_id: attrs.attr(&dom.customer_attr).map(str::to_string),
                row_id: attrs.attr(&dom.row_attr).map(str::to_string),
            });
        }

        for element in document.select(&id_sel) {
            let Some(id) = element.value().id() else {
                continue;
            };
            if id.starts_with(&dom.slot_prefix) {
                let text = element.text().collect::<String>();
                page.insert_slot(id.to_string(), ResultSlot::new(text.trim()));
            } else if id == dom.banner_id {
                let hidden = element.value().attr("style").is_some_and(hidden_by_style);
                page.set_banner(StatusBanner::new(!hidden));
            }
        }

        debug!(
            triggers = page.triggers().len(),
            slots = page.slot_count(),
            banner = page.banner().is_some(),
            "Page parsed"
        );

        Ok(page)
    }
}
