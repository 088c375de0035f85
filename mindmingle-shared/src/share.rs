#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::EnumIs,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SharePlatform {
    Twitter,
    Facebook,
    Linkedin,
    Whatsapp,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShareReq {
    pub platform: SharePlatform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ShareCount {
    pub count: u64,
}

#[cfg(test)]
mod share_tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;
    use test_log::test;

    use super::{SharePlatform, ShareReq};

    #[test]
    fn test_platform_names() {
        for platform in SharePlatform::iter() {
            let name = platform.to_string();
            assert_eq!(SharePlatform::from_str(&name).unwrap(), platform);
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
        assert!(SharePlatform::from_str("myspace").is_err());
    }

    #[test]
    fn test_share_req_payload() {
        let json = serde_json::to_string(&ShareReq {
            platform: SharePlatform::Whatsapp,
        })
        .unwrap();
        assert_eq!(json, r#"{"platform":"whatsapp"}"#);
    }
}
