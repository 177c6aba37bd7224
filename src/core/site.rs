use crate::domain::model::{Credentials, FetchRequest};
use crate::utils::error::Result;
use url::Url;

/// URLs of the shop, all relative to one base URL.
#[derive(Debug, Clone)]
pub struct SiteMap {
    base: Url,
}

impl SiteMap {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn home(&self) -> FetchRequest {
        FetchRequest::get(self.base.clone())
    }

    pub fn login(&self, credentials: &Credentials) -> Result<FetchRequest> {
        Ok(FetchRequest::post_form(
            self.base.join("account/logindata")?,
            vec![
                ("userEmail".to_string(), credentials.email.clone()),
                ("userPass".to_string(), credentials.password.clone()),
            ],
        ))
    }

    pub fn profile(&self) -> Result<FetchRequest> {
        Ok(FetchRequest::get(self.base.join("account/getprofilepagedata")?))
    }

    pub fn catalog_page(&self, page: u32) -> Result<FetchRequest> {
        let mut url = self.base.join("catalog")?;
        url.query_pairs_mut()
            .append_pair("all", "New")
            .append_pair("p", &page.to_string())
            .append_pair("morePage", &page.to_string());
        Ok(FetchRequest::get(url))
    }

    /// Root-relative hrefs resolve under the base path, not the host root.
    pub fn product(&self, href: &str) -> Result<FetchRequest> {
        Ok(FetchRequest::get(self.base.join(href.trim_start_matches('/'))?))
    }
}
