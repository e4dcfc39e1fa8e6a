//! Canned suggestions used when the response service is unreachable.
//!
//! Selection is pure and total: every input maps to exactly one of six
//! category outputs, chosen by the first matching keyword list in a fixed
//! priority order. No scoring, no overlap handling.

/// Troubleshooting explanation prepended to every fallback reply.
const FALLBACK_INTRO: &str = "I couldn't reach the response service just now. If this keeps \
happening, check that the Ollama endpoint configured in SAHAAY_OLLAMA_URL is running and that \
the model is pulled. Meanwhile, here is something I can help with once I'm back:";

const ROUTE_TERMS: &[&str] = &[
    "route", "traffic", "commute", "directions", "navigate", "way to", "reach",
];
const BILLING_TERMS: &[&str] = &[
    "bill",
    "payment",
    "recharge",
    "electricity",
    "water supply",
    "bescom",
    "utility",
];
const GROUP_TERMS: &[&str] = &["summarize", "summary", "catch up", "unread", "group"];
const WEATHER_TERMS: &[&str] = &["weather", "rain", "forecast", "temperature", "humidity"];
const TRANSLATION_TERMS: &[&str] = &["translate", "translation", "meaning", "kannada", "hindi"];

const ROUTE_SUGGESTION: &str = "Try: \"Best route to Whitefield right now?\" — I compare live \
traffic on the main corridors and suggest when to leave.";
const BILLING_SUGGESTION: &str = "Try: \"Help me pay my electricity bill\" — I can read a bill \
photo, create a payment link, and set a due-date reminder.";
const GROUP_SUGGESTION: &str = "Try: \"@sahaay summarize what I missed\" — I catch you up on a \
busy group thread in a few bullet points.";
const WEATHER_SUGGESTION: &str = "Try: \"Will it rain this evening?\" — I keep an eye on the \
local forecast so you don't get caught out.";
const TRANSLATION_SUGGESTION: &str = "Try: \"Translate this message to Kannada\" — I translate \
between the languages your neighbours use.";
const DEFAULT_SUGGESTION: &str = "Try asking about routes and traffic, utility bills, group-chat \
summaries, the weather, or translations.";

/// Pick the canned suggestion for `input`.
///
/// The input is lowercased and checked against keyword lists in priority
/// order: route, billing, group summary, weather, translation; anything else
/// gets the generic suggestion. Exactly one category is chosen.
#[must_use]
pub fn suggestion_for(input: &str) -> &'static str {
    let text = input.to_lowercase();
    if contains_any(&text, ROUTE_TERMS) {
        ROUTE_SUGGESTION
    } else if contains_any(&text, BILLING_TERMS) {
        BILLING_SUGGESTION
    } else if contains_any(&text, GROUP_TERMS) {
        GROUP_SUGGESTION
    } else if contains_any(&text, WEATHER_TERMS) {
        WEATHER_SUGGESTION
    } else if contains_any(&text, TRANSLATION_TERMS) {
        TRANSLATION_SUGGESTION
    } else {
        DEFAULT_SUGGESTION
    }
}

/// Full fallback reply content: troubleshooting text plus the matched
/// suggestion block.
#[must_use]
pub fn fallback_text(input: &str) -> String {
    format!("{FALLBACK_INTRO}\n\n{}", suggestion_for(input))
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_is_reachable() {
        assert_eq!(suggestion_for("best route to office"), ROUTE_SUGGESTION);
        assert_eq!(suggestion_for("pay my BILL please"), BILLING_SUGGESTION);
        assert_eq!(suggestion_for("summarize the thread"), GROUP_SUGGESTION);
        assert_eq!(suggestion_for("is rain expected"), WEATHER_SUGGESTION);
        assert_eq!(
            suggestion_for("translate this for me"),
            TRANSLATION_SUGGESTION
        );
        assert_eq!(suggestion_for("hello there"), DEFAULT_SUGGESTION);
    }

    #[test]
    fn route_wins_over_lower_priority_keywords() {
        // Both a route and a weather term; route is checked first.
        assert_eq!(
            suggestion_for("which route avoids the weather mess"),
            ROUTE_SUGGESTION
        );
        // Billing term after a route term in the same message.
        assert_eq!(
            suggestion_for("route to the bill payment counter"),
            ROUTE_SUGGESTION
        );
    }

    #[test]
    fn selection_is_deterministic() {
        let input = "weather and traffic and bills";
        assert_eq!(suggestion_for(input), suggestion_for(input));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(suggestion_for("TRAFFIC update?"), ROUTE_SUGGESTION);
    }

    #[test]
    fn every_input_maps_to_one_of_the_six_outputs() {
        let outputs = [
            ROUTE_SUGGESTION,
            BILLING_SUGGESTION,
            GROUP_SUGGESTION,
            WEATHER_SUGGESTION,
            TRANSLATION_SUGGESTION,
            DEFAULT_SUGGESTION,
        ];
        for input in ["", "random words", "weather bill route", "ಕನ್ನಡ"] {
            assert!(outputs.contains(&suggestion_for(input)));
        }
    }

    #[test]
    fn fallback_text_carries_intro_and_suggestion() {
        let text = fallback_text("route please");
        assert!(text.starts_with(FALLBACK_INTRO));
        assert!(text.ends_with(ROUTE_SUGGESTION));
    }
}
