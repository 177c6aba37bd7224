use chrono::{DateTime, Local};
use serde::Serialize;

/// A catalog product, filled in over the listing, detail and price stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub name: Option<String>,
    pub href: Option<String>,
    pub grivna_price: Option<f64>,
    pub dollar_price: Option<f64>,
    pub instock: Option<bool>,
    pub image_href: Option<String>,
    pub description: Option<String>,
    pub images_href: Vec<String>,
    pub date_parsed: Option<DateTime<Local>>,
}

/// Account data from the profile endpoint. Parsed and logged only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub orders: Vec<String>,
}

pub const DATE_PARSED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One exported CSV row. Field order is the column order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductRecord {
    pub name: Option<String>,
    pub href: Option<String>,
    pub grivna_price: Option<f64>,
    pub dollar_price: Option<f64>,
    pub instock: Option<bool>,
    pub image_href: Option<String>,
    pub description: Option<String>,
    pub images_href: String,
    pub date_parsed: Option<String>,
}

impl ProductRecord {
    pub const FIELDNAMES: [&'static str; 9] = [
        "name",
        "href",
        "grivna_price",
        "dollar_price",
        "instock",
        "image_href",
        "description",
        "images_href",
        "date_parsed",
    ];
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            href: product.href,
            grivna_price: product.grivna_price,
            dollar_price: product.dollar_price,
            instock: product.instock,
            image_href: product.image_href,
            description: product.description,
            images_href: product.images_href.join(","),
            date_parsed: product
                .date_parsed
                .map(|date| date.format(DATE_PARSED_FORMAT).to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchMethod {
    Get,
    PostForm(Vec<(String, String)>),
}

/// A single HTTP request issued by the crawler.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: FetchMethod,
    pub url: url::Url,
    /// Sent without the session cookie jar.
    pub isolated: bool,
}

impl FetchRequest {
    pub fn get(url: url::Url) -> Self {
        Self {
            method: FetchMethod::Get,
            url,
            isolated: false,
        }
    }

    pub fn post_form(url: url::Url, fields: Vec<(String, String)>) -> Self {
        Self {
            method: FetchMethod::PostForm(fields),
            url,
            isolated: false,
        }
    }

    pub fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }

    /// Key used by the duplicate-request filter.
    pub fn fingerprint(&self) -> String {
        match &self.method {
            FetchMethod::Get => format!("GET {}", self.url),
            FetchMethod::PostForm(_) => format!("POST {}", self.url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
