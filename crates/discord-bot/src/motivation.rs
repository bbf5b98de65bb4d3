use rand::seq::SliceRandom;
use rand::Rng;

static FACTION_MESSAGES: [(&str, [&str; 4]); 3] = [
    (
        "Laughing Meeks",
        [
            "Keep laughing in the face of adversity! Your faction is proud of your dedication!",
            "Another victory for the Laughing Meeks! Your time and effort strengthen the brotherhood!",
            "The Meeks legacy grows stronger with warriors like you! Keep up the amazing work!",
            "Laughter echoes through the ranks - your faction salutes your commitment!",
        ],
    ),
    (
        "Crimson Unicorns",
        [
            "Magnificent work, warrior! Your faction's power grows with every moment you contribute!",
            "The unicorns bow to your dedication! Keep charging forward for glory!",
            "Your commitment brings honor to the Crimson Unicorns! Stay fierce!",
            "Legend in the making! Your faction celebrates your unwavering spirit!",
        ],
    ),
    (
        "Special Activities Directive",
        [
            "Mission accomplished, operative! Your dedication to the directive is exemplary!",
            "Special activities require special dedication - and you've delivered! Outstanding work!",
            "The directive recognizes your exceptional commitment! Keep executing with precision!",
            "Your service to the Special Activities Directive is commendable! Stay focused!",
        ],
    ),
];

// Factions configured at deploy time get these.
static ANY_FACTION: [&str; 3] = [
    "Your faction grows stronger with every minute you put in. Great work!",
    "Another session banked for your faction! Keep it up!",
    "Your dedication keeps your faction in the race. Well played!",
];

static NO_FACTION: [&str; 4] = [
    "Great work in voice! Consider joining a faction to maximize your impact!",
    "Impressive dedication! A faction would be lucky to have someone with your commitment!",
    "Keep up the excellent work! Your potential could shine even brighter with a faction!",
    "Outstanding effort! Think about which faction could benefit from your dedication!",
];

fn pool(faction_name: Option<&str>) -> &'static [&'static str] {
    match faction_name {
        None => &NO_FACTION,
        Some(name) => FACTION_MESSAGES
            .iter()
            .find(|(faction, _)| *faction == name)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&ANY_FACTION),
    }
}

/// Pick a random encouragement for someone who just finished a session.
pub fn pick_message<R: Rng + ?Sized>(faction_name: Option<&str>, rng: &mut R) -> &'static str {
    pool(faction_name).choose(rng).copied().unwrap_or(NO_FACTION[0])
}

/// Every message that can be picked for the given faction.
pub fn messages_for(faction_name: Option<&str>) -> &'static [&'static str] {
    pool(faction_name)
}
