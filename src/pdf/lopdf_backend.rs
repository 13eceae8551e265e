//! Concrete [`FormBackend`] backed by `lopdf::Document`.
//!
//! Fields are written as merged field/widget dictionaries (one object per
//! field), except radio groups which get a parent field with one widget
//! kid per button. `/NeedAppearances` is set on the AcroForm so viewers
//! regenerate text appearances; checkbox and radio states carry their own
//! appearance streams because their on/off look is not regenerated by
//! every viewer.

use std::collections::HashSet;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat, Stream};

use super::backend::{
    CheckboxSpec, DropdownSpec, FieldAttributes, FormBackend, RadioGroupSpec, Rgb,
    SignatureFieldSpec, TextFieldSpec, WidgetStyle, BLACK,
};
use super::merge::{inherited_attribute, MergedDocument};
use crate::error::{Error, Result};
use crate::model::{PageSize, Rectangle};

// Field flags (`/Ff`).
const FLAG_READ_ONLY: i64 = 1;
const FLAG_REQUIRED: i64 = 1 << 1;
const FLAG_NO_TOGGLE_TO_OFF: i64 = 1 << 14;
const FLAG_RADIO: i64 = 1 << 15;
const FLAG_COMBO: i64 = 1 << 17;

// Annotation flag: print.
const ANNOT_PRINT: i64 = 4;

const HELVETICA: &[u8] = b"Helv";
const ZAPF_DINGBATS: &[u8] = b"ZaDb";

/// ZapfDingbats glyphs used for button appearances.
const CHECK_GLYPH: &str = "4";
const DOT_GLYPH: &str = "l";

/// Output document plus the AcroForm fields added to it.
pub struct LopdfFormBackend {
    doc: Document,
    pages: Vec<ObjectId>,
    fields: Vec<ObjectId>,
    names: HashSet<String>,
    helvetica: ObjectId,
    zapf: ObjectId,
    painted_pages: HashSet<ObjectId>,
}

impl LopdfFormBackend {
    /// Wrap a freshly merged document.
    pub fn new(merged: MergedDocument) -> Self {
        let MergedDocument {
            document: mut doc,
            pages,
            ..
        } = merged;
        let helvetica = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let zapf = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "ZapfDingbats",
        });
        Self {
            doc,
            pages,
            fields: Vec::new(),
            names: HashSet::new(),
            helvetica,
            zapf,
            painted_pages: HashSet::new(),
        }
    }

    /// Number of top-level fields added so far.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &Document {
        &self.doc
    }

    /// Install the AcroForm dictionary and serialize the document.
    ///
    /// Failures here are fatal for the conversion; the detail is logged and
    /// a generic [`Error::Save`] is returned.
    pub fn save_to_bytes(mut self) -> Result<Vec<u8>> {
        if let Err(e) = self.install_acroform() {
            log::error!("Failed to install AcroForm: {}", e);
            return Err(Error::Save);
        }

        self.doc.compress();
        let mut output = Vec::new();
        if let Err(e) = self.doc.save_to(&mut output) {
            log::error!("Failed to serialize output PDF: {}", e);
            return Err(Error::Save);
        }
        Ok(output)
    }

    fn install_acroform(&mut self) -> Result<()> {
        let root_id = self.doc.trailer.get(b"Root").and_then(Object::as_reference)?;
        let fields: Vec<Object> = self.fields.iter().map(|id| Object::Reference(*id)).collect();

        let acroform_id = self.doc.add_object(dictionary! {
            "Fields" => fields,
            "NeedAppearances" => true,
            "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
            "DR" => dictionary! {
                "Font" => self.font_resources(),
            },
        });

        self.doc
            .get_object_mut(root_id)?
            .as_dict_mut()?
            .set("AcroForm", Object::Reference(acroform_id));
        Ok(())
    }

    fn font_resources(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        fonts.set(HELVETICA.to_vec(), Object::Reference(self.helvetica));
        fonts.set(ZAPF_DINGBATS.to_vec(), Object::Reference(self.zapf));
        fonts
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(Error::PageOutOfRange(page_index, self.pages.len()))
    }

    /// Reject names the form layer cannot hold.
    ///
    /// Periods separate partial names in a fully qualified field name, so a
    /// name containing one would silently create a hierarchy.
    fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() || name.contains('.') || name.chars().any(char::is_control) {
            return Err(Error::InvalidFieldName(name.to_string()));
        }
        if self.names.contains(name) {
            return Err(Error::DuplicateFieldName(name.to_string()));
        }
        Ok(())
    }

    fn widget(attributes: &FieldAttributes, rect: &Rectangle, page_id: ObjectId) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "T" => text_string(&attributes.name),
            "Rect" => rect_object(rect),
            "P" => Object::Reference(page_id),
            "F" => Object::Integer(ANNOT_PRINT),
        };
        if let Some(tooltip) = &attributes.tooltip {
            dict.set("TU", text_string(tooltip));
        }
        let flags = field_flags(attributes);
        if flags != 0 {
            dict.set("Ff", Object::Integer(flags));
        }
        dict
    }

    /// Store a finished field, hook its widget onto the page and claim its name.
    fn commit_field(&mut self, page_id: ObjectId, name: &str, field: Dictionary) -> Result<()> {
        let field_id = self.doc.add_object(field);
        self.attach_annotation(page_id, field_id)?;
        self.fields.push(field_id);
        self.names.insert(name.to_string());
        Ok(())
    }

    fn attach_annotation(&mut self, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
        let mut annots = match self.doc.get_dictionary(page_id)?.get(b"Annots") {
            Ok(Object::Array(arr)) => arr.clone(),
            Ok(Object::Reference(id)) => self
                .doc
                .get_object(*id)
                .and_then(Object::as_array)
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        annots.push(Object::Reference(annot_id));
        self.doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Annots", Object::Array(annots));
        Ok(())
    }

    /// Add a form XObject usable as a widget appearance.
    fn add_appearance(&mut self, width: f64, height: f64, operations: Vec<Operation>) -> Result<ObjectId> {
        let content = Content { operations }.encode()?;
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![real(0.0), real(0.0), real(width), real(height)],
                "Resources" => dictionary! {
                    "Font" => self.font_resources(),
                },
            },
            content,
        );
        Ok(self.doc.add_object(stream))
    }

    /// Append a content stream, isolating the existing content in `q`/`Q`
    /// the first time a page is painted on.
    fn append_content(&mut self, page_id: ObjectId, operations: Vec<Operation>) -> Result<()> {
        let content = Content { operations }.encode()?;
        let stream_id = self.doc.add_object(Stream::new(Dictionary::new(), content));

        let existing = match self.doc.get_dictionary(page_id)?.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            _ => Vec::new(),
        };

        let first_paint = self.painted_pages.insert(page_id);
        let mut contents = Vec::with_capacity(existing.len() + 3);
        if first_paint && !existing.is_empty() {
            let save = self.doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            let restore = self.doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
            contents.push(Object::Reference(save));
            contents.extend(existing);
            contents.push(Object::Reference(restore));
        } else {
            contents.extend(existing);
        }
        contents.push(Object::Reference(stream_id));

        self.doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Contents", Object::Array(contents));
        Ok(())
    }
}

impl FormBackend for LopdfFormBackend {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize> {
        let page_id = self.page_id(page_index)?;
        let page = self.doc.get_dictionary(page_id)?;
        let media_box = page
            .get(b"MediaBox")
            .ok()
            .cloned()
            .or_else(|| inherited_attribute(&self.doc, page, b"MediaBox"))
            .and_then(|obj| number_array(&self.doc, &obj));

        match media_box {
            Some(bbox) => Ok(PageSize::from_media_box(bbox)),
            None => {
                log::warn!("Page {} has no usable MediaBox, assuming Letter", page_index + 1);
                Ok(PageSize::letter())
            }
        }
    }

    fn add_text_field(&mut self, page_index: usize, spec: &TextFieldSpec) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        self.validate_name(&spec.attributes.name)?;

        let mut field = Self::widget(&spec.attributes, &spec.rect, page_id);
        field.set("FT", "Tx");
        field.set("DA", default_appearance(HELVETICA, spec.font_size));
        if let Some(value) = &spec.value {
            field.set("V", text_string(value));
            field.set("DV", text_string(value));
        }
        if let Some(style) = &spec.style {
            field.set("MK", appearance_characteristics(style));
        }

        self.commit_field(page_id, &spec.attributes.name, field)
    }

    fn add_signature_field(&mut self, page_index: usize, spec: &SignatureFieldSpec) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        self.validate_name(&spec.attributes.name)?;

        let (width, height) = (spec.rect.width(), spec.rect.height());
        let normal = self.add_appearance(width, height, placeholder_ops(width, height, &spec.style))?;

        // No /V: the field stays unsigned.
        let mut field = Self::widget(&spec.attributes, &spec.rect, page_id);
        field.set("FT", "Sig");
        field.set("DA", default_appearance(HELVETICA, spec.font_size));
        field.set("MK", appearance_characteristics(&spec.style));
        field.set(
            "BS",
            dictionary! {
                "W" => Object::Integer(1),
                "S" => "S",
            },
        );
        field.set("AP", dictionary! { "N" => Object::Reference(normal) });

        self.commit_field(page_id, &spec.attributes.name, field)
    }

    fn add_checkbox(&mut self, page_index: usize, spec: &CheckboxSpec) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        self.validate_name(&spec.attributes.name)?;

        let (width, height) = (spec.rect.width(), spec.rect.height());
        let on = self.add_appearance(width, height, button_ops(width, height, Some(CHECK_GLYPH)))?;
        let off = self.add_appearance(width, height, button_ops(width, height, None))?;

        let state: &[u8] = if spec.checked { b"On" } else { b"Off" };
        let mut field = Self::widget(&spec.attributes, &spec.rect, page_id);
        field.set("FT", "Btn");
        field.set("V", Object::Name(state.to_vec()));
        field.set("AS", Object::Name(state.to_vec()));
        field.set("DA", default_appearance(ZAPF_DINGBATS, 0.0));
        field.set(
            "MK",
            dictionary! {
                "BC" => color_array(BLACK),
                "CA" => Object::string_literal(CHECK_GLYPH),
            },
        );
        field.set(
            "AP",
            dictionary! {
                "N" => dictionary! {
                    "On" => Object::Reference(on),
                    "Off" => Object::Reference(off),
                },
            },
        );

        self.commit_field(page_id, &spec.attributes.name, field)
    }

    fn add_radio_group(&mut self, spec: &RadioGroupSpec) -> Result<()> {
        let name = &spec.attributes.name;
        self.validate_name(name)?;
        if spec.buttons.is_empty() {
            return Err(Error::Unsupported(format!("radio group {} has no buttons", name)));
        }
        let page_ids = spec
            .buttons
            .iter()
            .map(|button| self.page_id(button.page_index))
            .collect::<Result<Vec<_>>>()?;

        let parent_id = self.doc.new_object_id();
        let mut used_states = HashSet::new();
        let mut selected_state: Option<Vec<u8>> = None;
        let mut kids = Vec::with_capacity(spec.buttons.len());

        for (index, (button, page_id)) in spec.buttons.iter().zip(page_ids).enumerate() {
            let state = unique_state_name(&button.export_value, index, &mut used_states);
            let is_on = selected_state.is_none()
                && spec.selected.as_deref() == Some(button.export_value.as_str());

            let (width, height) = (button.rect.width(), button.rect.height());
            let on = self.add_appearance(width, height, button_ops(width, height, Some(DOT_GLYPH)))?;
            let off = self.add_appearance(width, height, button_ops(width, height, None))?;

            let mut normal = Dictionary::new();
            normal.set(state.clone(), Object::Reference(on));
            normal.set("Off", Object::Reference(off));

            let appearance_state = if is_on { state.clone() } else { b"Off".to_vec() };
            if is_on {
                selected_state = Some(state);
            }

            let kid_id = self.doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "Parent" => Object::Reference(parent_id),
                "Rect" => rect_object(&button.rect),
                "P" => Object::Reference(page_id),
                "F" => Object::Integer(ANNOT_PRINT),
                "AS" => Object::Name(appearance_state),
                "AP" => dictionary! { "N" => normal },
                "MK" => dictionary! {
                    "BC" => color_array(BLACK),
                    "CA" => Object::string_literal(DOT_GLYPH),
                },
            });
            self.attach_annotation(page_id, kid_id)?;
            kids.push(Object::Reference(kid_id));
        }

        let mut parent = dictionary! {
            "FT" => "Btn",
            "T" => text_string(name),
            "Ff" => Object::Integer(field_flags(&spec.attributes) | FLAG_RADIO | FLAG_NO_TOGGLE_TO_OFF),
            "V" => Object::Name(selected_state.unwrap_or_else(|| b"Off".to_vec())),
            "DA" => default_appearance(ZAPF_DINGBATS, 0.0),
            "Kids" => kids,
        };
        if let Some(tooltip) = &spec.attributes.tooltip {
            parent.set("TU", text_string(tooltip));
        }
        self.doc.objects.insert(parent_id, Object::Dictionary(parent));
        self.fields.push(parent_id);
        self.names.insert(name.clone());
        Ok(())
    }

    fn add_dropdown(&mut self, page_index: usize, spec: &DropdownSpec) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        self.validate_name(&spec.attributes.name)?;
        if spec.options.is_empty() {
            return Err(Error::Unsupported(format!(
                "dropdown {} has no options",
                spec.attributes.name
            )));
        }

        let options: Vec<Object> = spec
            .options
            .iter()
            .map(|(label, value)| {
                if label == value {
                    text_string(label)
                } else {
                    Object::Array(vec![text_string(value), text_string(label)])
                }
            })
            .collect();

        let mut field = Self::widget(&spec.attributes, &spec.rect, page_id);
        field.set("FT", "Ch");
        field.set(
            "Ff",
            Object::Integer(field_flags(&spec.attributes) | FLAG_COMBO),
        );
        field.set("Opt", options);
        field.set("DA", default_appearance(HELVETICA, spec.font_size));
        field.set("MK", dictionary! { "BC" => color_array(BLACK) });
        if let Some(selected) = &spec.selected {
            field.set("V", text_string(selected));
            field.set("DV", text_string(selected));
        }

        self.commit_field(page_id, &spec.attributes.name, field)
    }

    fn fill_rect(&mut self, page_index: usize, rect: &Rectangle, color: Rgb) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        let [r, g, b] = color;
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![real(r), real(g), real(b)]),
            Operation::new(
                "re",
                vec![
                    real(rect.left),
                    real(rect.bottom),
                    real(rect.width()),
                    real(rect.height()),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.append_content(page_id, operations)
    }
}

fn field_flags(attributes: &FieldAttributes) -> i64 {
    let mut flags = 0;
    if attributes.read_only {
        flags |= FLAG_READ_ONLY;
    }
    if attributes.required {
        flags |= FLAG_REQUIRED;
    }
    flags
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn rect_object(rect: &Rectangle) -> Object {
    Object::Array(rect.to_array().iter().map(|&v| real(v)).collect())
}

fn color_array(color: Rgb) -> Object {
    Object::Array(color.iter().map(|&c| real(c)).collect())
}

fn appearance_characteristics(style: &WidgetStyle) -> Dictionary {
    dictionary! {
        "BC" => color_array(style.border),
        "BG" => color_array(style.background),
    }
}

/// `/DA` string; a size of zero means auto-size.
fn default_appearance(font: &[u8], size: f64) -> Object {
    let font = String::from_utf8_lossy(font);
    Object::string_literal(format!("/{} {} Tf 0 g", font, format_number(size)))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Read a numeric array (direct or referenced) such as a MediaBox.
fn number_array(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let arr = match obj {
        Object::Array(arr) => arr,
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        _ => return None,
    };
    let values: Vec<f64> = arr
        .iter()
        .filter_map(|o| match o {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r as f64),
            _ => None,
        })
        .collect();
    match values.as_slice() {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

/// Appearance for a button box, with an optional ZapfDingbats glyph centered in it.
/// Filled background with a 1pt border, drawn inside the widget box.
fn placeholder_ops(width: f64, height: f64, style: &WidgetStyle) -> Vec<Operation> {
    let [br, bg, bb] = style.background;
    let [cr, cg, cb] = style.border;
    vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![real(br), real(bg), real(bb)]),
        Operation::new("re", vec![real(0.0), real(0.0), real(width), real(height)]),
        Operation::new("f", vec![]),
        Operation::new("RG", vec![real(cr), real(cg), real(cb)]),
        Operation::new("w", vec![real(1.0)]),
        Operation::new(
            "re",
            vec![
                real(0.5),
                real(0.5),
                real((width - 1.0).max(0.0)),
                real((height - 1.0).max(0.0)),
            ],
        ),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn button_ops(width: f64, height: f64, glyph: Option<&str>) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("G", vec![real(0.0)]),
        Operation::new("w", vec![real(0.75)]),
        Operation::new(
            "re",
            vec![
                real(0.5),
                real(0.5),
                real((width - 1.0).max(0.0)),
                real((height - 1.0).max(0.0)),
            ],
        ),
        Operation::new("S", vec![]),
    ];

    if let Some(glyph) = glyph {
        let size = width.min(height) * 0.8;
        let x = (width - size * 0.8) / 2.0;
        let y = (height - size * 0.7) / 2.0;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("g", vec![real(0.0)]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(ZAPF_DINGBATS.to_vec()), real(size)],
        ));
        ops.push(Operation::new("Td", vec![real(x), real(y)]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(glyph)]));
        ops.push(Operation::new("ET", vec![]));
    }

    ops.push(Operation::new("Q", vec![]));
    ops
}

/// Appearance state name for a radio export value, unique within its group.
fn unique_state_name(export_value: &str, index: usize, used: &mut HashSet<Vec<u8>>) -> Vec<u8> {
    let sanitized: String = export_value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let mut state = if sanitized.is_empty() || sanitized == "Off" {
        format!("option_{}", index)
    } else {
        sanitized
    };
    if used.contains(state.as_bytes()) {
        state = format!("{}_{}", state, index);
    }
    let state = state.into_bytes();
    used.insert(state.clone());
    state
}
