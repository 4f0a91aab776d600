//! The service tiles shown on the main page.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubService {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    /// Accent colour as `#rrggbb`.
    pub color: &'static str,
    pub services: &'static [SubService],
}

impl Category {
    /// Identifier sent to the assistant for one of this category's tiles.
    pub fn service_id(&self, sub: &SubService) -> String {
        format!("{}.{}", self.id, sub.id)
    }
}

const fn sub(id: &'static str, title: &'static str) -> SubService {
    SubService { id, title }
}

pub static CATEGORIES: [Category; 6] = [
    Category {
        id: "communication",
        title: "Communiquer",
        color: "#37a2ea",
        services: &[
            sub("text", "Messages Texte"),
            sub("video", "Messages Vidéo"),
            sub("audio", "Messages Audio"),
        ],
    },
    Category {
        id: "medical",
        title: "Médical",
        color: "#3748ea",
        services: &[
            sub("medication", "Mes Médicaments"),
            sub("appointments", "Rendez-vous"),
            sub("doctors", "Mes Médecins"),
        ],
    },
    Category {
        id: "wellbeing",
        title: "Bien-être",
        color: "#ea7f37",
        services: &[
            sub("exercise", "Exercices"),
            sub("meditation", "Méditation"),
            sub("brain", "Stimulation Cognitive"),
            sub("social", "Activités Sociales"),
        ],
    },
    Category {
        id: "home",
        title: "Maison",
        color: "#37ead9",
        services: &[
            sub("cleaning", "Ménage"),
            sub("laundry", "Repassage"),
            sub("shopping", "Courses"),
            sub("repair", "Bricolage"),
        ],
    },
    Category {
        id: "games",
        title: "Jeux Cognitifs",
        color: "#37a2ea",
        services: &[
            sub("circuit", "Circuit Interface"),
            sub("hunt", "Chasse aux Fonctions"),
            sub("simon", "Simon Interface"),
            sub("quiz", "Quiz Visuel"),
            sub("match", "Associe et Gagne"),
            sub("memory", "Mémoire Active"),
        ],
    },
    Category {
        id: "finance",
        title: "Finances",
        color: "#3748ea",
        services: &[
            sub("expenses", "Dépenses"),
            sub("gifts", "Cadeaux"),
            sub("shopping", "Achats"),
        ],
    },
];

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}
