//! Mood-aware greetings and motivational tips for plans built without the AI.

use chrono::{Local, Timelike};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::plan::Mood;

pub const DEFAULT_NAME: &str = "there";

const GREETINGS_MOTIVATED: [&str; 3] = [
    "Good {time}, {name}! I see you're feeling motivated today - let's channel that energy!",
    "Hey {name}! Loving your motivation today. Let's make it count!",
    "{name}, your motivated energy is perfect for tackling today's challenges!",
];

const GREETINGS_TIRED: [&str; 3] = [
    "Good {time}, {name}. I see you're feeling tired - let's plan a gentle day.",
    "Hey {name}, we all get tired. I've crafted a manageable plan for your energy levels.",
    "Rest is important, {name}. Here's a balanced plan that respects your tired state.",
];

const GREETINGS_OVERWHELMED: [&str; 3] = [
    "Good {time}, {name}. Feeling overwhelmed? Let's break things down into small steps.",
    "Hey {name}, I can help simplify things when you're overwhelmed. One task at a time.",
    "{name}, I've created a focused plan to help you navigate through the overwhelm.",
];

const GREETINGS_CALM: [&str; 3] = [
    "Good {time}, {name}. Your calm state is perfect for thoughtful work today.",
    "Hey {name}, love that calm energy! Let's maintain that balance throughout the day.",
    "{name}, I've designed a plan that complements your calm mindset perfectly.",
];

const TIPS: [&str; 8] = [
    "Small steps today = Big wins tomorrow.",
    "Progress over perfection. Keep moving forward!",
    "You don't have to be perfect to make progress.",
    "Focus on what matters most, let go of the rest.",
    "Every productive day begins with a solid plan.",
    "The difference between ordinary and extraordinary is that little extra.",
    "Your future self will thank you for the effort you put in today.",
    "Remember to celebrate your wins, no matter how small.",
];

fn greeting_table(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Motivated => &GREETINGS_MOTIVATED,
        Mood::Tired => &GREETINGS_TIRED,
        Mood::Overwhelmed => &GREETINGS_OVERWHELMED,
        Mood::Calm => &GREETINGS_CALM,
    }
}

pub fn time_of_day(hour: u32) -> &'static str {
    if hour < 12 {
        "morning"
    } else if hour < 17 {
        "afternoon"
    } else {
        "evening"
    }
}

/// Greeting for the current local hour, drawn from the thread RNG.
pub fn greeting(mood: &str, name: &str) -> String {
    greeting_with(mood, name, Local::now().hour(), &mut rand::thread_rng())
}

pub fn tip() -> String {
    tip_with(&mut rand::thread_rng())
}

pub fn greeting_with<R: Rng + ?Sized>(mood: &str, name: &str, hour: u32, rng: &mut R) -> String {
    let template = greeting_table(Mood::parse(mood))
        .choose(rng)
        .copied()
        .unwrap_or(GREETINGS_MOTIVATED[0]);
    let name = if name.trim().is_empty() {
        DEFAULT_NAME
    } else {
        name
    };

    template
        .replace("{time}", time_of_day(hour))
        .replace("{name}", name)
}

pub fn tip_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    TIPS.choose(rng).copied().unwrap_or(TIPS[0]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn greeting_is_drawn_from_mood_table() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let text = greeting_with("tired", "Sam", 8, &mut rng);
            let matches_table = GREETINGS_TIRED.iter().any(|template| {
                template.replace("{time}", "morning").replace("{name}", "Sam") == text
            });
            assert!(matches_table, "unexpected greeting: {text}");
        }
    }

    #[test]
    fn unknown_mood_uses_motivated_table() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = greeting_with("bewildered", DEFAULT_NAME, 14, &mut rng);
        let matches_table = GREETINGS_MOTIVATED.iter().any(|template| {
            template
                .replace("{time}", "afternoon")
                .replace("{name}", DEFAULT_NAME)
                == text
        });
        assert!(matches_table);
    }

    #[test]
    fn same_seed_same_choice() {
        let first = tip_with(&mut StdRng::seed_from_u64(42));
        let second = tip_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert!(TIPS.contains(&first.as_str()));
    }

    #[test]
    fn time_of_day_boundaries() {
        assert_eq!(time_of_day(11), "morning");
        assert_eq!(time_of_day(12), "afternoon");
        assert_eq!(time_of_day(16), "afternoon");
        assert_eq!(time_of_day(17), "evening");
    }

    #[test]
    fn blank_name_uses_default() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = greeting_with("calm", "  ", 9, &mut rng);
        assert!(text.contains(DEFAULT_NAME));
    }
}
