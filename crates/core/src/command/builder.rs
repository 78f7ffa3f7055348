//! Three-class argument collection for xcodebuild invocations.
//!
//! Arguments fall into build settings (`KEY=VALUE`), parameters (`-flag`
//! with an optional value), and action verbs, and xcodebuild is
//! order-sensitive across those classes: settings must come first and
//! actions last. Within each class a key declared twice keeps its first
//! position but takes its last value.

use std::collections::HashMap;

use super::xcodebuild::XcodebuildCommand;

/// Action verbs xcodebuild accepts; anything else in a free-form token
/// list is not an action.
pub const ACTION_VERBS: &[&str] = &[
    "build",
    "clean",
    "test",
    "archive",
    "analyze",
    "build-for-testing",
    "test-without-building",
    "docbuild",
];

/// Collects build settings, parameters, and actions in declaration order,
/// then renders them as a deduplicated argument vector.
///
/// A pure accumulator: malformed free-form tokens become warnings carried
/// on the finished command, never errors and never log lines.
#[derive(Debug, Default)]
pub struct CommandBuilder {
    settings: Vec<(String, String)>,
    parameters: Vec<(String, Option<String>)>,
    actions: Vec<String>,
    warnings: Vec<String>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a `KEY=VALUE` build setting.
    pub fn setting(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.push((key.into(), value.into()));
    }

    /// Declare a `-flag value` parameter.
    pub fn parameter(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((flag.into(), Some(value.into())));
    }

    /// Declare a bare `-flag` with no value.
    pub fn bare(&mut self, flag: impl Into<String>) {
        self.parameters.push((flag.into(), None));
    }

    /// Declare an action verb.
    pub fn action(&mut self, verb: impl Into<String>) {
        self.actions.push(verb.into());
    }

    /// Merge free-form tokens, classifying each one heuristically:
    ///
    /// - `-flag` followed by a token that is not a flag, a setting, or an
    ///   action verb consumes both as a parameter pair;
    /// - any other `-flag` is a bare option;
    /// - `KEY=VALUE` is a build setting, split on the first `=`;
    /// - a recognized action verb is an action;
    /// - everything else is dropped with a warning; it must not leak into
    ///   the invocation as a positional argument.
    pub fn push_raw(&mut self, tokens: &[String]) {
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.starts_with('-') {
                let value = tokens.get(i + 1).filter(|next| !classifiable(next));
                match value {
                    Some(value) => {
                        self.parameters.push((token.clone(), Some(value.clone())));
                        i += 2;
                    }
                    None => {
                        self.parameters.push((token.clone(), None));
                        i += 1;
                    }
                }
            } else if let Some(eq) = token.find('=') {
                let (key, value) = token.split_at(eq);
                self.settings.push((key.to_string(), value[1..].to_string()));
                i += 1;
            } else if ACTION_VERBS.contains(&token.as_str()) {
                self.actions.push(token.clone());
                i += 1;
            } else {
                self.warnings
                    .push(format!("ignoring unrecognized argument '{token}'"));
                i += 1;
            }
        }
    }

    /// Render the final command: settings, then parameters, then actions,
    /// each class deduplicated on its own.
    pub fn finish(self) -> XcodebuildCommand {
        let mut args = Vec::new();

        for (key, value) in dedup_by(self.settings, |(key, _)| key) {
            args.push(format!("{key}={value}"));
        }
        for (flag, value) in dedup_by(self.parameters, |(flag, _)| flag) {
            args.push(flag);
            if let Some(value) = value {
                args.push(value);
            }
        }
        for verb in dedup_by(self.actions, |verb| verb) {
            args.push(verb);
        }

        XcodebuildCommand {
            args,
            warnings: self.warnings,
            working_dir: None,
            env: Vec::new(),
        }
    }
}

/// True when a token stands on its own in some class, so a preceding flag
/// must not swallow it as a value.
fn classifiable(token: &str) -> bool {
    token.starts_with('-') || token.contains('=') || ACTION_VERBS.contains(&token)
}

/// Stable dedup: the surviving entry sits where the key was first
/// declared, but carries the value of its last declaration.
fn dedup_by<T, K>(items: Vec<T>, key: K) -> Vec<T>
where
    K: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match positions.get(key(&item)) {
            Some(&at) => kept[at] = item,
            None => {
                positions.insert(key(&item).to_string(), kept.len());
                kept.push(item);
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn classes_render_in_fixed_order() {
        let mut builder = CommandBuilder::new();
        builder.action("build");
        builder.parameter("-scheme", "App");
        builder.setting("ARCHS", "arm64");

        let command = builder.finish();
        assert_eq!(command.args, strings(&["ARCHS=arm64", "-scheme", "App", "build"]));
    }

    #[test]
    fn redeclared_setting_keeps_first_position_and_last_value() {
        let mut builder = CommandBuilder::new();
        builder.setting("ARCHS", "arm64");
        builder.setting("ONLY_ACTIVE_ARCH", "YES");
        builder.setting("ARCHS", "x86_64");

        let command = builder.finish();
        assert_eq!(
            command.args,
            strings(&["ARCHS=x86_64", "ONLY_ACTIVE_ARCH=YES"])
        );
    }

    #[test]
    fn redeclared_parameter_may_gain_or_lose_its_value() {
        let mut builder = CommandBuilder::new();
        builder.bare("-quiet");
        builder.parameter("-destination", "id=A");
        builder.parameter("-destination", "id=B");

        let command = builder.finish();
        assert_eq!(command.args, strings(&["-quiet", "-destination", "id=B"]));
    }

    #[test]
    fn actions_are_deduplicated_in_order() {
        let mut builder = CommandBuilder::new();
        builder.action("clean");
        builder.action("build");
        builder.action("clean");

        let command = builder.finish();
        assert_eq!(command.args, strings(&["clean", "build"]));
    }

    #[test]
    fn free_form_tokens_classify_into_all_three_classes() {
        // Scenario: a bare flag, a setting, and an action in one list.
        let mut builder = CommandBuilder::new();
        builder.push_raw(&strings(&["-quiet", "ARCHS=arm64", "clean"]));

        let command = builder.finish();
        assert_eq!(command.args, strings(&["ARCHS=arm64", "-quiet", "clean"]));
        assert!(command.warnings.is_empty());
    }

    #[test]
    fn flag_value_pairs_are_consumed_greedily() {
        let mut builder = CommandBuilder::new();
        builder.push_raw(&strings(&["-sdk", "iphonesimulator", "-quiet", "-json"]));

        let command = builder.finish();
        assert_eq!(
            command.args,
            strings(&["-sdk", "iphonesimulator", "-quiet", "-json"])
        );
    }

    #[test]
    fn trailing_flag_is_bare() {
        let mut builder = CommandBuilder::new();
        builder.push_raw(&strings(&["-allowProvisioningUpdates"]));

        let command = builder.finish();
        assert_eq!(command.args, strings(&["-allowProvisioningUpdates"]));
    }

    #[test]
    fn unrecognized_token_warns_and_disappears() {
        let mut builder = CommandBuilder::new();
        builder.push_raw(&strings(&["???", "build"]));

        let command = builder.finish();
        assert_eq!(command.args, strings(&["build"]));
        assert_eq!(command.warnings.len(), 1);
        assert!(command.warnings[0].contains("???"));
        assert!(!command.args.iter().any(|a| a.contains("???")));
    }

    #[test]
    fn setting_value_may_contain_equals() {
        let mut builder = CommandBuilder::new();
        builder.push_raw(&strings(&["OTHER_SWIFT_FLAGS=-DFOO=1"]));

        let command = builder.finish();
        assert_eq!(command.args, strings(&["OTHER_SWIFT_FLAGS=-DFOO=1"]));
    }

    #[test]
    fn free_form_setting_overrides_structured_one_in_place() {
        let mut builder = CommandBuilder::new();
        builder.setting("ARCHS", "arm64");
        builder.parameter("-scheme", "App");
        builder.push_raw(&strings(&["ARCHS=x86_64"]));

        let command = builder.finish();
        assert_eq!(
            command.args,
            strings(&["ARCHS=x86_64", "-scheme", "App"])
        );
    }
}
