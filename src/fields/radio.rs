//! Radio groups.
//!
//! Each button is positioned from its own coordinates and may sit on any
//! page of the tab's document. Any unmappable button fails the whole group.

use super::{Attempt, FieldTier, Request, TranslateOutcome, Translator};
use crate::error::{Error, Result};
use crate::geometry::radio_rectangle;
use crate::pdf::{RadioButtonSpec, RadioGroupSpec};

const RADIO_PLACEHOLDER: &str = "[SELECT ONE]";

impl<'a> Translator<'a> {
    pub(super) fn build_radio_group(&mut self, request: &Request<'_>) -> TranslateOutcome {
        let attempts: [(FieldTier, Attempt<'a>); 2] = [
            (FieldTier::Specialized, Self::radio_group),
            (FieldTier::PlainFallback, Self::radio_text),
        ];
        self.first_success(request, &attempts)
    }

    fn radio_buttons(&mut self, request: &Request<'_>) -> Result<(Vec<RadioButtonSpec>, Option<String>)> {
        let placement = request.placement;
        let min = self.sizes.radio;
        let mut buttons = Vec::with_capacity(request.tab.radios.len());
        let mut selected = None;

        for (index, option) in request.tab.radios.iter().enumerate() {
            let page_index = match option.page_number() {
                Some(number) => placement.mapping.page_index(number).ok_or(Error::PageOutOfRange(
                    number as usize,
                    placement.mapping.page_count,
                ))?,
                None => placement.page_index,
            };
            let page = self.backend.page_size(page_index)?;
            let rect = radio_rectangle(option, &page, min).ok_or_else(|| {
                Error::Unsupported(format!("radio option {} has invalid geometry", index))
            })?;
            let export_value = option
                .value()
                .unwrap_or_else(|| format!("option_{}", index));

            if selected.is_none() && option.is_selected() {
                selected = Some(export_value.clone());
            }
            buttons.push(RadioButtonSpec {
                page_index,
                rect: rect.with_min_size(min.width, min.height),
                export_value,
            });
        }
        Ok((buttons, selected))
    }

    fn radio_group(&mut self, request: &Request<'_>) -> Result<()> {
        let (buttons, selected) = self.radio_buttons(request)?;
        let base = request.tab.group_name().unwrap_or(request.base_name());
        let spec = RadioGroupSpec {
            attributes: self.attributes(request, base),
            buttons,
            selected,
        };
        self.backend.add_radio_group(&spec)
    }

    fn radio_text(&mut self, request: &Request<'_>) -> Result<()> {
        let selected = request
            .tab
            .radios
            .iter()
            .find(|option| option.is_selected())
            .and_then(|option| option.value());
        let base = request.tab.group_name().unwrap_or(request.base_name());
        let text = selected.unwrap_or_else(|| RADIO_PLACEHOLDER.to_string());
        self.plain_text(request, base, &text)
    }
}
