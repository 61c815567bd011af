//! Positional command-line templating for `execute`.

use crate::error::TemplateError;

/// Substitutes each `{}` in `template` with the matching argument.
///
/// # Errors
///
/// Returns an error when the number of `{}` slots and arguments differ.
pub fn format_template(template: &str, args: &[&str]) -> Result<String, TemplateError> {
    let placeholders = template.matches("{}").count();
    if placeholders != args.len() {
        return Err(TemplateError::ArgumentCount {
            placeholders,
            supplied: args.len(),
        });
    }
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    for arg in args {
        // count above guarantees a slot for every argument
        if let Some(index) = rest.find("{}") {
            result.push_str(&rest[..index]);
            result.push_str(arg);
            rest = &rest[index + 2..];
        }
    }
    result.push_str(rest);
    Ok(result)
}

/// Formats the template and splits the result into an argument vector
/// with shell-style quoting rules.
///
/// # Errors
///
/// Returns an error on slot/argument mismatch or unbalanced quoting.
pub fn build_argv(template: &str, args: &[&str]) -> Result<Vec<String>, TemplateError> {
    let line = format_template(template, args)?;
    shell_words::split(&line).map_err(|_| TemplateError::Tokenize(line.clone()))
}
