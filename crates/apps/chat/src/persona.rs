use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTACT_ID: &str = "rebecca";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub id: &'static str,
    pub display_name: &'static str,
    pub blurb: &'static str,
}

pub const DEFAULT_CONTACTS: [Contact; 1] = [Contact {
    id: DEFAULT_CONTACT_ID,
    display_name: "Rebecca",
    blurb: "a cheerful friend who loves small talk, games, and asking about the user's day",
}];

pub fn contact(id: &str) -> Option<&'static Contact> {
    DEFAULT_CONTACTS.iter().find(|contact| contact.id == id)
}

/// What the persona prompt may say about the desktop user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaContext {
    pub user_name: Option<String>,
    pub timezone: Option<String>,
}

impl PersonaContext {
    pub fn system_persona(&self, contact_id: &str) -> String {
        let mut persona = match contact(contact_id) {
            Some(known) => format!(
                "You are {}, {}. Reply in a short, friendly chat style.",
                known.display_name, known.blurb
            ),
            None => format!(
                "You are {contact_id}, a contact in a virtual desktop chat app. \
                 Reply in a short, friendly chat style."
            ),
        };
        if let Some(name) = self.user_name.as_deref() {
            persona.push_str(&format!(" You are chatting with {name}."));
        }
        if let Some(timezone) = self.timezone.as_deref() {
            persona.push_str(&format!(" Their timezone is {timezone}."));
        }
        persona
    }
}
