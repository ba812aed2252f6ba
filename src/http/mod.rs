// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP data carried by a captured request
//!
//! Header filtering, request body payload extraction and the cookie jar
//! that backs cookie enrichment.

mod body;
mod cookie;
mod headers;

pub use body::{encode_component, parse_form_payload, FormField, RequestBody, UploadData};
pub use cookie::{cookie_string, Cookie, CookieJar, CookieSource, SameSite};
pub use headers::{
    filter_headers, is_excluded, HeaderEntry, HeaderSet, EXCLUDED_HEADERS, PSEUDO_HEADER_PREFIX,
};

/// Header names the filter knows about
pub mod names {
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONNECTION: &str = "connection";
    pub const COOKIE: &str = "cookie";
    pub const HOST: &str = "host";
}
