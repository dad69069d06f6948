//! SOAP action presence checks.
//!
//! A SOAP 1.1 request (`Content-Type: text/xml`) must carry a `SoapAction`
//! header. A SOAP 1.2 request (`Content-Type: application/soap+xml`) carries
//! the action as the third `;`-separated parameter of its content type, as in
//! `application/soap+xml;charset=utf-8;action=urn:op`. A SOAP 1.2 content
//! type with fewer than three segments counts as having no action.

use std::fmt;

use thiserror::Error;

use crate::http::headers::HeaderMap;

const CONTENT_TYPE_NAMES: &[&str] = &["Content-Type", "content-type"];
const SOAP_ACTION_NAMES: &[&str] = &["SoapAction", "SOAPAction", "soapaction"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapVersion {
    Soap11,
    Soap12,
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapVersion::Soap11 => f.write_str("SOAP 1.1"),
            SoapVersion::Soap12 => f.write_str("SOAP 1.2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SoapActionError {
    #[error("no SoapAction set for {0}")]
    MissingSoapAction(SoapVersion),
}

/// Detect the SOAP version from `Content-Type` and check the action is present.
///
/// Returns `Ok(None)` for requests that are not SOAP at all.
pub fn check_soap_action(headers: &HeaderMap) -> Result<Option<SoapVersion>, SoapActionError> {
    let Some(content_type) = headers.get_any(CONTENT_TYPE_NAMES) else {
        return Ok(None);
    };
    let segments: Vec<&str> = content_type.split(';').collect();
    let media_type = segments[0].trim();

    if media_type.starts_with("text/xml") {
        if headers.get_any(SOAP_ACTION_NAMES).is_none() {
            return Err(SoapActionError::MissingSoapAction(SoapVersion::Soap11));
        }
        return Ok(Some(SoapVersion::Soap11));
    }

    if media_type.starts_with("application/soap+xml") {
        let has_action = segments
            .get(2)
            .is_some_and(|segment| segment.trim_start().starts_with("action"));
        if !has_action {
            return Err(SoapActionError::MissingSoapAction(SoapVersion::Soap12));
        }
        return Ok(Some(SoapVersion::Soap12));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, *value);
        }
        map
    }

    #[test]
    fn soap11_requires_soap_action() {
        let missing = headers(&[("Content-Type", "text/xml")]);
        assert_eq!(
            check_soap_action(&missing),
            Err(SoapActionError::MissingSoapAction(SoapVersion::Soap11))
        );

        let present = headers(&[("Content-Type", "text/xml"), ("SoapAction", "foo")]);
        assert_eq!(check_soap_action(&present), Ok(Some(SoapVersion::Soap11)));
    }

    #[test]
    fn soap11_with_charset_parameter() {
        let present = headers(&[
            ("Content-Type", "text/xml;charset=utf-8"),
            ("SOAPAction", "\"urn:op\""),
        ]);
        assert_eq!(check_soap_action(&present), Ok(Some(SoapVersion::Soap11)));
    }

    #[test]
    fn empty_soap_action_counts_as_missing() {
        let empty = headers(&[("Content-Type", "text/xml"), ("SoapAction", "")]);
        assert!(check_soap_action(&empty).is_err());
    }

    #[test]
    fn soap12_reads_action_from_third_segment() {
        let ok = headers(&[(
            "Content-Type",
            "application/soap+xml;charset=utf-8;action=urn:op",
        )]);
        assert_eq!(check_soap_action(&ok), Ok(Some(SoapVersion::Soap12)));

        let spaced = headers(&[(
            "Content-Type",
            "application/soap+xml; charset=utf-8; action=\"urn:op\"",
        )]);
        assert_eq!(check_soap_action(&spaced), Ok(Some(SoapVersion::Soap12)));

        let wrong = headers(&[(
            "Content-Type",
            "application/soap+xml;charset=utf-8;boundary=x",
        )]);
        assert!(check_soap_action(&wrong).is_err());
    }

    #[test]
    fn short_soap12_content_type_is_missing_action() {
        for value in ["application/soap+xml", "application/soap+xml;charset=utf-8"] {
            let short = headers(&[("Content-Type", value)]);
            assert_eq!(
                check_soap_action(&short),
                Err(SoapActionError::MissingSoapAction(SoapVersion::Soap12))
            );
        }
    }

    #[test]
    fn non_soap_requests_pass() {
        assert_eq!(check_soap_action(&HeaderMap::new()), Ok(None));
        let json = headers(&[("Content-Type", "application/json")]);
        assert_eq!(check_soap_action(&json), Ok(None));
    }

    #[test]
    fn lowercase_content_type_name_is_accepted() {
        let lower = headers(&[("content-type", "text/xml")]);
        assert!(check_soap_action(&lower).is_err());
    }
}
