//! Field extraction for the catalog, product and profile pages.
//!
//! Every extractor returns `None` when its node or value is missing; the
//! callers decide whether that drops the product.

use crate::core::document::{AttrMatch, Node};
use crate::core::normalize::{clean, clean_value, parse_json, to_number};
use crate::domain::model::{Product, User};
use crate::utils::error::Result;
use scraper::Html;
use serde_json::Value;
use std::cell::OnceCell;

pub const INSTOCK_PHRASE: &str = "в наличии";
pub const FIRST_ITEM_CLASS: &str = "product-item func-product-list-item func-first";
pub const ITEM_CLASS: &str = "product-item func-product-list-item";

pub fn extract_name<N: Node>(item: &N) -> Option<String> {
    let name = clean(&item.find("span", AttrMatch::Class("product-name"))?.text_content());
    (!name.is_empty()).then_some(name)
}

pub fn extract_href<N: Node>(item: &N) -> Option<String> {
    let link = item.find("a", AttrMatch::Class("product-item-img"))?;
    let href = clean(link.attr("href")?);
    (!href.is_empty()).then_some(href)
}

/// Thumbnail `src` inside the product link.
pub fn extract_image_href<N: Node>(item: &N) -> Option<String> {
    let link = item.find("a", AttrMatch::Class("product-item-img"))?;
    let src = clean(link.find("img", AttrMatch::Any)?.attr("src")?);
    (!src.is_empty()).then_some(src)
}

fn price_tokens(text: &str) -> Vec<String> {
    clean(text)
        .split_whitespace()
        .filter(|token| {
            let digits = token.replace('.', "");
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect()
}

/// Dollar price from the listing; exactly one numeric token is accepted.
pub fn extract_dollar_price<N: Node>(item: &N) -> Option<f64> {
    let tokens = price_tokens(&item.find("p", AttrMatch::Class("list-cost"))?.text_content());
    if tokens.len() != 1 {
        return None;
    }
    to_number(&tokens[0])
}

pub fn extract_instock<N: Node>(item: &N) -> Option<bool> {
    let text = clean(&item.find("span", AttrMatch::Class("instock"))?.text_content()).to_lowercase();
    (!text.is_empty() && INSTOCK_PHRASE.contains(text.as_str())).then_some(true)
}

/// Grivna price from the product page; one or more numeric tokens are joined.
pub fn extract_grivna_price<N: Node>(page: &N) -> Option<f64> {
    let Some(cost) = page.find("p", AttrMatch::Class("info-cost")) else {
        tracing::error!("Error with extract grivna price. P_tag is not found");
        return None;
    };
    let tokens = price_tokens(&cost.text_content());
    if tokens.is_empty() {
        return None;
    }
    to_number(&tokens.concat())
}

pub fn extract_description<N: Node>(page: &N) -> Option<String> {
    let container = page.find("div", AttrMatch::Id("product-item-description"))?;
    let paragraphs = container.find_all("p", AttrMatch::NoClass);
    if paragraphs.is_empty() {
        return None;
    }
    Some(
        paragraphs
            .iter()
            .map(|p| clean(&p.text_content()))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

pub fn extract_images_href<N: Node>(page: &N) -> Option<Vec<String>> {
    let container = page.find("div", AttrMatch::Id("product-item-imgs"))?;
    let hrefs: Vec<String> = container
        .find_all("a", AttrMatch::Any)
        .iter()
        .filter_map(|a| a.attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();
    (!hrefs.is_empty()).then_some(hrefs)
}

/// HTML carried in a `{"html": "..."}` envelope, used by the "load more" pages.
fn embedded_listing(body: &str) -> Option<Html> {
    let envelope = match parse_json(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Listing body is not a JSON envelope: {}", e);
            return None;
        }
    };
    let html = envelope.get("html")?.as_str()?;
    if html.is_empty() {
        return None;
    }
    Some(Html::parse_fragment(html))
}

/// Builds a listing-stage product, dropping it at the first missing field.
pub fn listing_product<N: Node>(item: &N) -> Option<Product> {
    let mut product = Product::default();

    product.name = extract_name(item);
    if product.name.is_none() {
        tracing::info!("Name tag is not found");
        return None;
    }

    product.href = extract_href(item);
    if product.href.is_none() {
        tracing::info!("Href tag is not found");
        return None;
    }

    product.dollar_price = extract_dollar_price(item);
    if product.dollar_price.is_none() {
        tracing::info!("Price tag is not found");
        return None;
    }

    product.instock = extract_instock(item);
    if product.instock.is_none() {
        tracing::info!("Instock tag is not found");
        return None;
    }

    product.image_href = extract_image_href(item);
    Some(product)
}

#[derive(Debug, Default)]
pub struct Listing {
    pub products: Vec<Product>,
    pub discarded: usize,
}

/// Parses a catalog response, either plain HTML or a JSON envelope.
/// First-item nodes come before the generic ones.
pub fn parse_listing(body: &str) -> Listing {
    let page = Html::parse_document(body);
    let embedded: OnceCell<Option<Html>> = OnceCell::new();
    let mut listing = Listing::default();

    for class in [FIRST_ITEM_CLASS, ITEM_CLASS] {
        let mut items = page.root_element().find_all("div", AttrMatch::Class(class));
        if items.is_empty() {
            if let Some(fragment) = embedded.get_or_init(|| embedded_listing(body)) {
                items = fragment.root_element().find_all("div", AttrMatch::Class(class));
            }
        }

        for item in &items {
            match listing_product(item) {
                Some(product) => listing.products.push(product),
                None => listing.discarded += 1,
            }
        }
    }
    listing
}

/// Adds description and gallery. `None` when the gallery is missing.
pub fn parse_detail(body: &str, mut product: Product) -> Option<Product> {
    let page = Html::parse_document(body);
    let root = page.root_element();

    product.description = extract_description(&root);
    if product.description.is_none() {
        tracing::info!("Description is not found");
    }

    match extract_images_href(&root) {
        Some(images) => {
            product.images_href = images;
            Some(product)
        }
        None => {
            tracing::info!("Images href is not found");
            None
        }
    }
}

pub fn parse_grivna_price(body: &str) -> Option<f64> {
    let page = Html::parse_document(body);
    extract_grivna_price(&page.root_element())
}

fn optional_text(object: &Value, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => clean_value(value).map(Some),
    }
}

/// Parses the profile endpoint. `Ok(None)` when there is no `User` object.
pub fn parse_profile(body: &str) -> Result<Option<User>> {
    let data = parse_json(body)?;
    let Some(user_data) = data.get("User").filter(|user| user.is_object()) else {
        tracing::error!("User data is not found");
        return Ok(None);
    };

    let mut user = User {
        guid: optional_text(user_data, "Guid")?,
        name: optional_text(user_data, "Name")?,
        email: optional_text(user_data, "Email")?,
        phone: optional_text(user_data, "Phone")?,
        city: optional_text(user_data, "City")?,
        orders: Vec::new(),
    };

    if let Some(Value::Array(orders)) = data.get("Orders") {
        for order in orders {
            let id = match order {
                Value::Number(number) => number.to_string(),
                other => clean_value(other)?,
            };
            user.orders.push(id);
        }
    }
    Ok(Some(user))
}
