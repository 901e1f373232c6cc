use reqwest::Url;

use crate::error::Result;

/// Performs a blocking GET and returns the response body.
///
/// Implementations surface non-success statuses as errors rather than
/// handing back an error page as a body.
pub trait HttpClient {
    fn get_text(&self, url: &Url) -> Result<String>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get_text(&self, url: &Url) -> Result<String> {
        (**self).get_text(url)
    }
}
