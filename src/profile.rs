//! Data shown on the settings page. Everything here is sample data kept in
//! memory; profile edits last until the window closes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    LastName,
    FirstName,
    Email,
    Phone,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] =
        [ProfileField::LastName, ProfileField::FirstName, ProfileField::Email, ProfileField::Phone];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::LastName => "Nom",
            ProfileField::FirstName => "Prénom",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Téléphone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            last_name: "Dupont".into(),
            first_name: "Marie".into(),
            email: "marie.dupont@example.com".into(),
            phone: "06 12 34 56 78".into(),
        }
    }
}

impl UserProfile {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::LastName => &self.last_name,
            ProfileField::FirstName => &self.first_name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::LastName => &mut self.last_name,
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
        };
        *slot = value.into();
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyContact {
    pub id: u32,
    pub name: String,
    pub relation: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub id: u32,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: u32,
    pub date: String,
    pub time: String,
    pub doctor: String,
    pub place: String,
}

/// Keys for third-party services, displayed masked and read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyKey {
    pub service: String,
    pub masked_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalRecord {
    pub doctors: Vec<Doctor>,
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsData {
    pub profile: UserProfile,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub third_party_keys: Vec<ThirdPartyKey>,
    pub medical: MedicalRecord,
}

impl Default for SettingsData {
    fn default() -> Self {
        let key = |service: &str| ThirdPartyKey {
            service: service.into(),
            masked_key: "xxxx-xxxx-xxxx-xxxx".into(),
        };
        Self {
            profile: UserProfile::default(),
            emergency_contacts: vec![
                EmergencyContact { id: 1, name: "Dupont Jean".into(), relation: "Fils".into(), phone: "06 23 45 67 89".into() },
                EmergencyContact { id: 2, name: "Martin Sophie".into(), relation: "Petite-fille".into(), phone: "06 34 56 78 90".into() },
            ],
            third_party_keys: vec![key("MediReminder"), key("Speechify"), key("Aimybox")],
            medical: MedicalRecord {
                doctors: vec![
                    Doctor { id: 1, name: "Dr. Martin".into(), specialty: "Généraliste".into(), phone: "01 23 45 67 89".into() },
                    Doctor { id: 2, name: "Dr. Dubois".into(), specialty: "Cardiologue".into(), phone: "01 34 56 78 90".into() },
                ],
                medications: vec![
                    Medication { id: 1, name: "Doliprane".into(), dosage: "1000mg".into(), frequency: "3 fois par jour".into() },
                    Medication { id: 2, name: "Kardégic".into(), dosage: "75mg".into(), frequency: "1 fois par jour".into() },
                ],
                appointments: vec![
                    Appointment { id: 1, date: "15/06/2025".into(), time: "10:00".into(), doctor: "Dr. Martin".into(), place: "Cabinet médical".into() },
                    Appointment { id: 2, date: "22/06/2025".into(), time: "14:30".into(), doctor: "Dr. Dubois".into(), place: "Hôpital Saint-Louis".into() },
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_edits_only_touch_the_named_field() {
        let mut profile = UserProfile::default();
        profile.set(ProfileField::Email, "marie@exemple.fr");
        assert_eq!(profile.get(ProfileField::Email), "marie@exemple.fr");
        assert_eq!(profile.get(ProfileField::LastName), "Dupont");
        assert_eq!(profile.display_name(), "Marie Dupont");
    }
}
