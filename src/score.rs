/// Score used for labels outside the fixed table.
pub const DEFAULT_MOOD_SCORE: u8 = 50;

/// Moods offered by the entry form, with the emoji recorded alongside them.
pub const MOOD_CATALOG: [(&str, &str); 8] = [
    ("Happy", "😊"),
    ("Neutral", "😐"),
    ("Sad", "😢"),
    ("Angry", "😡"),
    ("Tired", "😴"),
    ("Anxious", "😰"),
    ("Thoughtful", "🤔"),
    ("Excited", "🥳"),
];

/// Maps a mood label to a 0-100 intensity. Unknown labels count as neutral.
pub fn mood_score(mood: &str) -> u8 {
    match mood {
        "Excited" => 100,
        "Happy" => 90,
        "Thoughtful" => 60,
        "Neutral" => 50,
        "Anxious" => 30,
        "Tired" => 20,
        "Sad" => 10,
        "Angry" => 0,
        _ => DEFAULT_MOOD_SCORE,
    }
}

pub fn default_emoji(mood: &str) -> Option<&'static str> {
    MOOD_CATALOG
        .iter()
        .find(|(label, _)| *label == mood)
        .map(|(_, emoji)| *emoji)
}
