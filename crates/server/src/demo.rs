use rattle::{widget::display_value, App, RattleError, WidgetRegistry};

pub(crate) const NUMBER_INPUT: &str = "number_input";
pub(crate) const RESULT: &str = "result";

/// The bundled "Advanced Maths" app: squares whatever is typed into
/// `input#number_input` and shows it in `label#result`.
pub(crate) fn advanced_maths(title: &str, template: String) -> Result<App, RattleError> {
    let mut app = App::new(title, template)?;
    app.on(NUMBER_INPUT, "input", square_input)?;
    Ok(app)
}

fn square_input(widgets: &mut WidgetRegistry) -> Result<(), RattleError> {
    let result = square(&display_value(widgets.field(NUMBER_INPUT, "value")?));
    widgets.set(RESULT, "text", result)
}

pub(crate) fn square(raw: &str) -> String {
    match raw.trim().parse::<i128>() {
        Ok(n) => n
            .checked_mul(n)
            .map_or_else(|| "Number too large!".to_string(), |squared| squared.to_string()),
        Err(_) => "Not a number!".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/demo_tests.rs"]
mod tests;
