//! Catalog entity types and their REST representations.
//!
//! Records travel as camelCase JSON. Identifiers are assigned by the
//! backend and may be numeric or textual, so they are modelled as an
//! untagged [`EntityId`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::table::{FieldValue, Record};

/// A REST resource managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// The category collection.
    #[default]
    Categories,
    /// The product collection.
    Products,
}

impl Resource {
    /// Title shown in headers and tabs.
    pub fn title(&self) -> &'static str {
        match self {
            Resource::Categories => "Categories",
            Resource::Products => "Products",
        }
    }

    /// Singular noun used in messages ("Failed to add category").
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Categories => "category",
            Resource::Products => "product",
        }
    }

    /// Capitalized singular noun used in dialog titles.
    pub fn noun(&self) -> &'static str {
        match self {
            Resource::Categories => "Category",
            Resource::Products => "Product",
        }
    }

    /// The other resource, for tab switching.
    pub fn next(&self) -> Self {
        match self {
            Resource::Categories => Resource::Products,
            Resource::Products => Resource::Categories,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Categories => f.write_str("categories"),
            Resource::Products => f.write_str("products"),
        }
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "categories" | "category" => Ok(Resource::Categories),
            "products" | "product" => Ok(Resource::Products),
            other => Err(format!(
                "unknown resource '{}' (expected 'categories' or 'products')",
                other
            )),
        }
    }
}

/// A backend-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl EntityId {
    /// Parse user input, preferring a numeric identifier.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(trimmed.to_string()),
        }
    }

    /// Whether this is the empty placeholder of an unsaved record.
    pub fn is_blank(&self) -> bool {
        matches!(self, EntityId::Text(s) if s.trim().is_empty())
    }

    /// The identifier as a sortable field value.
    pub fn as_field(&self) -> FieldValue<'_> {
        match self {
            EntityId::Number(n) => FieldValue::Integer(*n),
            EntityId::Text(s) => FieldValue::Text(s),
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::Text(String::new())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name the column reads and sorts by.
    pub key: &'static str,
    /// Header label.
    pub label: &'static str,
    /// Relative width in percent.
    pub width: u16,
}

/// How a form field is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
}

/// Description of one editable field in the add/edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFieldSpec {
    /// Field name.
    pub key: &'static str,
    /// Input label.
    pub label: &'static str,
    /// Parsing rule.
    pub kind: FieldKind,
    /// Whether an empty value is rejected.
    pub required: bool,
    /// Whether the field is read-only while editing an existing record.
    pub locked_on_edit: bool,
}

/// Raw text values collected from a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(HashMap<&'static str, String>);

impl FormValues {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Get the trimmed value of a field, or an empty string.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// Check the required fields of `specs` and return the first problem.
    pub fn check(&self, specs: &[FormFieldSpec]) -> Result<(), String> {
        if specs
            .iter()
            .any(|spec| spec.required && self.get(spec.key).is_empty())
        {
            return Err("Please fill in all fields".to_string());
        }

        for spec in specs {
            let value = self.get(spec.key);
            if value.is_empty() {
                continue;
            }
            match spec.kind {
                FieldKind::Text => {}
                FieldKind::Integer => {
                    value
                        .parse::<i64>()
                        .map_err(|_| format!("{} must be a whole number", spec.label))?;
                }
                FieldKind::Decimal => {
                    let parsed = value
                        .parse::<f64>()
                        .map_err(|_| format!("{} must be a number", spec.label))?;
                    if !parsed.is_finite() {
                        return Err(format!("{} must be a number", spec.label));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Read a field that the backend may send as `null`, falling back to the
/// type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A catalog record managed through a REST resource.
pub trait Entity:
    Record + Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The resource this entity lives under.
    const RESOURCE: Resource;

    /// The record identifier.
    fn id(&self) -> &EntityId;

    /// Replace the record identifier.
    fn set_id(&mut self, id: EntityId);

    /// Columns shown in the list table, in order.
    fn columns() -> &'static [Column];

    /// Fields shown in the add/edit dialog, in order.
    fn form_fields() -> &'static [FormFieldSpec];

    /// Field the list is sorted by when first shown.
    fn default_sort() -> &'static str {
        "name"
    }

    /// Build a record from validated form input.
    fn from_form(values: &FormValues) -> Result<Self, String>;

    /// Text shown for a field in tables and pre-filled forms.
    fn display_field(&self, key: &str) -> String {
        self.field(key).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Current values of the form fields, for editing.
    fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        for spec in Self::form_fields() {
            values.insert(spec.key, self.display_field(spec.key));
        }
        values
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier. Omitted from create requests when blank.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "EntityId::is_blank"
    )]
    pub id: EntityId,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Category {
    /// Create a category.
    pub fn new(id: impl Into<EntityId>, name: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

const CATEGORY_COLUMNS: &[Column] = &[
    Column {
        key: "id",
        label: "ID",
        width: 15,
    },
    Column {
        key: "name",
        label: "Name",
        width: 35,
    },
    Column {
        key: "description",
        label: "Description",
        width: 50,
    },
];

const CATEGORY_FORM: &[FormFieldSpec] = &[
    FormFieldSpec {
        key: "id",
        label: "ID",
        kind: FieldKind::Text,
        required: false,
        locked_on_edit: true,
    },
    FormFieldSpec {
        key: "name",
        label: "Name",
        kind: FieldKind::Text,
        required: true,
        locked_on_edit: false,
    },
    FormFieldSpec {
        key: "description",
        label: "Description",
        kind: FieldKind::Text,
        required: false,
        locked_on_edit: false,
    },
];

impl Record for Category {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(self.id.as_field()),
            "name" => Some(FieldValue::Text(&self.name)),
            "description" => Some(FieldValue::Text(&self.description)),
            _ => None,
        }
    }
}

impl Entity for Category {
    const RESOURCE: Resource = Resource::Categories;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn columns() -> &'static [Column] {
        CATEGORY_COLUMNS
    }

    fn form_fields() -> &'static [FormFieldSpec] {
        CATEGORY_FORM
    }

    fn from_form(values: &FormValues) -> Result<Self, String> {
        values.check(CATEGORY_FORM)?;
        Ok(Self {
            id: EntityId::parse(values.get("id")),
            name: values.get("name").to_string(),
            description: values.get("description").to_string(),
        })
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier. Omitted from create requests when blank.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "EntityId::is_blank"
    )]
    pub id: EntityId,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    /// Units in stock.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    /// Unit price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Image reference handed to the backend as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product without an image.
    pub fn new(id: impl Into<EntityId>, product_name: &str, quantity: i64, price: f64) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.to_string(),
            quantity,
            price,
            image: None,
        }
    }
}

const PRODUCT_COLUMNS: &[Column] = &[
    Column {
        key: "id",
        label: "ID",
        width: 10,
    },
    Column {
        key: "productName",
        label: "Product",
        width: 35,
    },
    Column {
        key: "quantity",
        label: "Quantity",
        width: 15,
    },
    Column {
        key: "price",
        label: "Price",
        width: 15,
    },
    Column {
        key: "image",
        label: "Image",
        width: 25,
    },
];

const PRODUCT_FORM: &[FormFieldSpec] = &[
    FormFieldSpec {
        key: "productName",
        label: "Product Name",
        kind: FieldKind::Text,
        required: true,
        locked_on_edit: false,
    },
    FormFieldSpec {
        key: "quantity",
        label: "Quantity",
        kind: FieldKind::Integer,
        required: true,
        locked_on_edit: false,
    },
    FormFieldSpec {
        key: "price",
        label: "Price",
        kind: FieldKind::Decimal,
        required: true,
        locked_on_edit: false,
    },
    FormFieldSpec {
        key: "image",
        label: "Image",
        kind: FieldKind::Text,
        required: true,
        locked_on_edit: false,
    },
];

impl Record for Product {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(self.id.as_field()),
            // The product name doubles as the generic name used by the list filter.
            "productName" | "name" => Some(FieldValue::Text(&self.product_name)),
            "quantity" => Some(FieldValue::Integer(self.quantity)),
            "price" => Some(FieldValue::Float(self.price)),
            "image" => self.image.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

impl Entity for Product {
    const RESOURCE: Resource = Resource::Products;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn columns() -> &'static [Column] {
        PRODUCT_COLUMNS
    }

    fn form_fields() -> &'static [FormFieldSpec] {
        PRODUCT_FORM
    }

    fn default_sort() -> &'static str {
        "productName"
    }

    fn from_form(values: &FormValues) -> Result<Self, String> {
        values.check(PRODUCT_FORM)?;
        // check() has already rejected unparsable numbers.
        Ok(Self {
            id: EntityId::default(),
            product_name: values.get("productName").to_string(),
            quantity: values.get("quantity").parse().unwrap_or(0),
            price: values.get("price").parse().unwrap_or(0.0),
            image: Some(values.get("image").to_string()),
        })
    }
}
