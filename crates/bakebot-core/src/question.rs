/// How hard a duel question is; scales the damage of a landed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// An immutable Q&A entry drawn at random for each duel round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub answer: &'static str,
    pub difficulty: Difficulty,
}

const fn q(text: &'static str, answer: &'static str, difficulty: Difficulty) -> Question {
    Question {
        text,
        answer,
        difficulty,
    }
}

/// The fixed duel question pool.
pub const DUEL_QUESTIONS: &[Question] = &[
    q(
        "What ingredient makes bread rise?",
        "yeast",
        Difficulty::Easy,
    ),
    q(
        "What temp (F) is commonly used to bake cookies?",
        "350",
        Difficulty::Easy,
    ),
    q(
        "What grain is traditional sourdough made from?",
        "wheat",
        Difficulty::Easy,
    ),
    q(
        "What do you call the outer layer of a loaf?",
        "crust",
        Difficulty::Easy,
    ),
    q(
        "What does baking soda need to activate?",
        "acid",
        Difficulty::Medium,
    ),
    q(
        "What protein network gives bread dough its stretch?",
        "gluten",
        Difficulty::Medium,
    ),
    q(
        "What is the resting step after kneading called?",
        "proofing",
        Difficulty::Medium,
    ),
    q(
        "What French bread is shaped as a long thin stick?",
        "baguette",
        Difficulty::Medium,
    ),
    q(
        "What is a mixture of flour and water used to seed fermentation called?",
        "starter",
        Difficulty::Hard,
    ),
    q(
        "What process browns the crust through sugar and amino acids?",
        "maillard reaction",
        Difficulty::Hard,
    ),
    q(
        "What enriched French bread is loaded with eggs and butter?",
        "brioche",
        Difficulty::Hard,
    ),
    q(
        "What Italian flour grade is typically used for pizza dough?",
        "00",
        Difficulty::Hard,
    ),
];
