use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn no_commands_message(category: Option<&str>) -> String {
    match category {
        Some(cat) => format!("No commands found in category: {}", display_category(cat)),
        None => "No commands are registered.".to_owned(),
    }
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, unknown_category_message};
    use crate::CommandMeta;

    const PING: CommandMeta = CommandMeta {
        name: "ping",
        desc: "Pong.",
        category: "utility",
        usage: "!ping",
    };
    const MONITOR: CommandMeta = CommandMeta {
        name: "monitor",
        desc: "Set the country.",
        category: "monitoring",
        usage: "!monitor <country>",
    };

    #[test]
    fn groups_under_category_headings() {
        assert_eq!(
            grouped_help_description(&[&MONITOR, &PING]),
            "**Monitoring**\n`monitor`: Set the country.\n\n**Utility**\n`ping`: Pong."
        );
        assert_eq!(grouped_help_description(&[]), "No commands available.");
    }

    #[test]
    fn lists_valid_categories() {
        assert_eq!(
            unknown_category_message("admin", &["monitoring", "utility"]),
            "Unknown category: Admin\nValid categories: Monitoring, Utility"
        );
    }
}
