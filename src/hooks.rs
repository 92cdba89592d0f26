use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// State and callbacks for a text field that commits a validated value.
#[derive(Clone)]
pub struct ValidatedInput {
    /// The current text content of the input field.
    pub text: String,
    /// Error from the last failed commit, cleared on the next success.
    pub error: Option<String>,
    /// Callback for the `oninput` event. Only updates the text.
    pub on_text_input: Callback<InputEvent>,
    /// Parse the current text and hand the value to `on_valid` if it passes.
    /// Wired to `onchange` and to Enter.
    pub on_commit: Callback<()>,
}

/// Keep an editable text field in step with a store value.
///
/// Typing only changes the text; committing parses it and forwards the value.
/// When `value` changes from outside (a reset, a loaded snapshot) the text is
/// replaced with the new value.
#[hook]
pub fn use_validated_input<T>(
    value: T,
    parse_and_validate: Rc<dyn Fn(&str) -> Result<T, String>>,
    on_valid: Callback<T>,
) -> ValidatedInput
where
    T: Clone + PartialEq + std::fmt::Display + 'static,
{
    let text_handle = use_state(|| value.to_string());
    let error_handle = use_state(|| None::<String>);

    let on_text_input = {
        let text_setter = text_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let on_commit = {
        let current_text = text_handle.clone();
        let error_setter = error_handle.clone();
        Callback::from(move |_| match parse_and_validate(current_text.as_str()) {
            Ok(parsed) => {
                error_setter.set(None);
                current_text.set(parsed.to_string());
                on_valid.emit(parsed);
            }
            Err(msg) => error_setter.set(Some(msg)),
        })
    };

    // Replace the text when the committed value changes elsewhere
    {
        let text_setter = text_handle.clone();
        let error_setter = error_handle.clone();
        use_effect_with(value, move |current| {
            text_setter.set(current.to_string());
            error_setter.set(None);
            || ()
        });
    }

    ValidatedInput {
        text: (*text_handle).clone(),
        error: (*error_handle).clone(),
        on_text_input,
        on_commit,
    }
}
