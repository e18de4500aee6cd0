//! Prompt construction for tour generation.

use crate::services::providers::{ChatMessage, ChatRequest};
use crate::services::PipelineError;

/// Build the chat request asking the model for `count` placemarks in `place`.
///
/// The system message embeds `template` as the formatting example.
pub fn build_tour_prompt(
    place: &str,
    count: usize,
    template: &str,
) -> Result<ChatRequest, PipelineError> {
    let place = place.trim();
    if place.is_empty() {
        return Err(PipelineError::InvalidInput("Text is required".to_string()));
    }

    let system = format!(
        "You are an AI that generates the content of .kml files. Always follow this template:\n\
         {template}\n\
         Use the same styles as this template. Only output the KML document, with every \
         point of interest written as a <Placemark> containing a <Point>. Coordinates must \
         reference genuine points of interest in the requested place and use the \
         longitude,latitude,altitude order of the template."
    );
    let user = format!(
        "Generate a kml file for {place} and give me {count} placemarks, ordered as a walking tour."
    );

    Ok(ChatRequest {
        messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::TEMPLATE_KML;
    use crate::services::providers::ChatRole;

    #[test]
    fn system_message_carries_the_template() {
        let request = build_tour_prompt("Geneva", 5, TEMPLATE_KML).unwrap();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert!(request.messages[0].content.contains(TEMPLATE_KML));
        assert!(request.messages[0].content.contains("genuine points of interest"));
    }

    #[test]
    fn user_message_names_place_and_count() {
        let request = build_tour_prompt("  Lisbon ", 7, TEMPLATE_KML).unwrap();

        assert_eq!(request.messages[1].role, ChatRole::User);
        assert!(request.messages[1].content.contains("Lisbon and"));
        assert!(request.messages[1].content.contains("7 placemarks"));
    }

    #[test]
    fn blank_place_is_invalid_input() {
        let err = build_tour_prompt("   ", 5, TEMPLATE_KML).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }
}
