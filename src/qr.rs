use url::Url;

use crate::api::client::ApiClient;
use crate::errors::BackendError;
use crate::profile::UserProfile;

pub const QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const QR_VALIDITY_MINUTES: u32 = 15;

/// Caption under the code, naming whoever it belongs to.
pub fn owner_caption(profile: &UserProfile) -> String {
    format!("QR Code pour {}", profile.display_name())
}

/// The code another user scans to add this user as a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrShare {
    pub user_id: String,
}

impl QrShare {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into() }
    }

    pub fn payload(&self) -> String {
        format!("ConnecteurSocial:UserID={}", self.user_id)
    }

    pub fn image_url(&self) -> Url {
        let mut url = Url::parse(QR_SERVICE).expect("QR service URL is valid");
        url.query_pairs_mut()
            .append_pair("size", "300x300")
            .append_pair("data", &self.payload())
            .append_pair("color", "003d99");
        url
    }

    /// Download the PNG for this code.
    pub async fn fetch_image(&self, client: &ApiClient) -> Result<Vec<u8>, BackendError> {
        client.get_bytes(self.image_url().as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileField;

    #[test]
    fn image_url_encodes_the_payload() {
        let share = QrShare::new("12345");
        let url = share.image_url();
        assert_eq!(url.host_str(), Some("api.qrserver.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("size".into(), "300x300".into())));
        assert!(pairs.contains(&("data".into(), "ConnecteurSocial:UserID=12345".into())));
        assert!(pairs.contains(&("color".into(), "003d99".into())));
    }

    #[test]
    fn caption_follows_profile_edits() {
        let mut profile = UserProfile::default();
        assert_eq!(owner_caption(&profile), "QR Code pour Marie Dupont");
        profile.set(ProfileField::FirstName, "Jeanne");
        assert_eq!(owner_caption(&profile), "QR Code pour Jeanne Dupont");
    }
}
