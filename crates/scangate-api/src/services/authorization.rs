//! Upload authorization issuance.
//!
//! Produces the opaque reference and the signed form template a client must
//! replay verbatim when POSTing its file. Inputs are trusted: the callback
//! URL has already passed the protocol allow-list, and the size bounds have
//! been validated at the request boundary.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use scangate_core::{
    Config, PrepareUploadResponse, Reference, SignedFormFields, UploadFormTemplate,
    UploadRequestConstraints,
};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";
const POLICY_VALIDITY_HOURS: i64 = 1;

/// Issues one reference + signed form template per initiate call.
///
/// Deterministic apart from reference generation and timestamps; performs no
/// I/O and no validation of its own.
#[derive(Clone)]
pub struct UploadAuthorizationIssuer {
    upload_href: String,
    acl: String,
    credential_access_key: String,
    region: String,
    signing_secret: String,
}

impl UploadAuthorizationIssuer {
    pub fn from_config(config: &Config) -> Self {
        UploadAuthorizationIssuer {
            upload_href: config.upload_href(),
            acl: config.upload_acl.clone(),
            credential_access_key: config.credential_access_key.clone(),
            region: config.aws_region.clone(),
            signing_secret: config.form_signing_secret.clone(),
        }
    }

    pub fn prepare_upload(&self, constraints: &UploadRequestConstraints) -> PrepareUploadResponse {
        let reference = Reference::generate();
        let now = Utc::now();

        let policy = self.build_policy(&reference, constraints);
        let policy_b64 = BASE64.encode(policy.to_string());
        let signature = self.sign(&policy_b64);

        let fields = SignedFormFields {
            algorithm: SIGNING_ALGORITHM.to_string(),
            credential: format!(
                "{}/{}/{}/s3/aws4_request",
                self.credential_access_key,
                now.format("%Y%m%d"),
                self.region
            ),
            date: now.format("%Y%m%dT%H%M%SZ").to_string(),
            policy: policy_b64,
            signature,
            acl: self.acl.clone(),
            key: reference.to_string(),
            callback_url: constraints.callback_url.clone(),
        };

        PrepareUploadResponse {
            reference,
            upload_request: UploadFormTemplate {
                href: self.upload_href.clone(),
                fields,
            },
        }
    }

    /// S3 POST-policy document covering the constraints the client committed
    /// to at initiate time.
    fn build_policy(
        &self,
        reference: &Reference,
        constraints: &UploadRequestConstraints,
    ) -> serde_json::Value {
        let expiration = Utc::now() + Duration::hours(POLICY_VALIDITY_HOURS);
        let mut conditions = vec![
            serde_json::json!([
                "content-length-range",
                constraints.minimum_file_size,
                constraints.maximum_file_size
            ]),
            serde_json::json!({ "acl": self.acl }),
            serde_json::json!({ "key": reference.as_str() }),
            serde_json::json!({ "Content-Type": constraints.expected_mime_type }),
        ];
        if let Some(redirect) = &constraints.success_redirect {
            conditions.push(serde_json::json!({ "success_action_redirect": redirect }));
        }
        if let Some(redirect) = &constraints.error_redirect {
            conditions.push(serde_json::json!({ "error_action_redirect": redirect }));
        }

        serde_json::json!({
            "expiration": expiration.to_rfc3339(),
            "conditions": conditions,
        })
    }

    fn sign(&self, policy_b64: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(policy_b64.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> UploadAuthorizationIssuer {
        UploadAuthorizationIssuer {
            upload_href: "http://localhost:3000/upload".to_string(),
            acl: "private".to_string(),
            credential_access_key: "ASIAxxxbbcc".to_string(),
            region: "us-east-1".to_string(),
            signing_secret: "test-secret-key-min-16-chars".to_string(),
        }
    }

    fn constraints() -> UploadRequestConstraints {
        UploadRequestConstraints {
            minimum_file_size: 0,
            maximum_file_size: 1024,
            expected_mime_type: "application/pdf".to_string(),
            callback_url: "https://my.callback.url".to_string(),
            success_redirect: None,
            error_redirect: None,
        }
    }

    #[test]
    fn key_field_equals_reference() {
        let response = issuer().prepare_upload(&constraints());
        assert_eq!(response.upload_request.fields.key, response.reference.to_string());
    }

    #[test]
    fn references_are_unique_per_call() {
        let issuer = issuer();
        let first = issuer.prepare_upload(&constraints());
        let second = issuer.prepare_upload(&constraints());
        assert_ne!(first.reference, second.reference);
    }

    #[test]
    fn callback_url_is_echoed_in_fields() {
        let response = issuer().prepare_upload(&constraints());
        assert_eq!(
            response.upload_request.fields.callback_url,
            "https://my.callback.url"
        );
    }

    #[test]
    fn policy_encodes_content_length_range() {
        let response = issuer().prepare_upload(&constraints());
        let policy_json = BASE64
            .decode(&response.upload_request.fields.policy)
            .expect("base64 policy");
        let policy: serde_json::Value = serde_json::from_slice(&policy_json).expect("json policy");

        let conditions = policy["conditions"].as_array().expect("conditions");
        assert!(conditions.iter().any(|c| {
            c.as_array().is_some_and(|a| {
                a.first().and_then(|v| v.as_str()) == Some("content-length-range")
                    && a.get(1).and_then(|v| v.as_u64()) == Some(0)
                    && a.get(2).and_then(|v| v.as_u64()) == Some(1024)
            })
        }));
    }

    #[test]
    fn signature_is_hmac_over_policy() {
        let issuer = issuer();
        let response = issuer.prepare_upload(&constraints());
        let fields = &response.upload_request.fields;

        let mut mac = HmacSha256::new_from_slice(b"test-secret-key-min-16-chars")
            .expect("HMAC accepts any key size");
        mac.update(fields.policy.as_bytes());
        assert_eq!(fields.signature, hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn redirects_are_carried_into_policy_only() {
        let mut constraints = constraints();
        constraints.success_redirect = Some("https://example.com/ok".to_string());
        let response = issuer().prepare_upload(&constraints);

        let policy_json = BASE64
            .decode(&response.upload_request.fields.policy)
            .expect("base64 policy");
        let policy = String::from_utf8(policy_json).expect("utf8 policy");
        assert!(policy.contains("success_action_redirect"));

        let fields_json =
            serde_json::to_string(&response.upload_request.fields).expect("serialize");
        assert!(!fields_json.contains("success_action_redirect"));
    }
}
