//! Tour scripts and the interpreter that plays them.

use std::path::Path;

use super::operator::Operator;
use super::runner::{Invocation, Runner, shell_word};
use super::{SAMPLE_NAME, TourError};
use crate::path::SearchPath;
use crate::report;

pub const CONTINUE: &str = "Press Enter to continue...";

/// One argument of a command template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Lit(&'static str),
    /// Absolute path of the repository the tour is working on.
    RepoPath,
    /// Project name the sample repository is imported under.
    SampleName,
}

/// Arguments for the installed CLI; the program comes from the context.
pub type CommandTemplate = &'static [Arg];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Say(&'static str),
    /// Text the user should send in the chat.
    Quote(&'static str),
    /// Wait for Enter, with a custom prompt if given.
    Pause(Option<&'static str>),
    /// Print a command for the user to run in another terminal. `{command}` in
    /// the text is replaced with the rendered command.
    Show(&'static str, CommandTemplate),
    /// Like `Show`, for a shell line that does not go through the installed
    /// CLI. `{repo}` in the line is replaced with the quoted repository path.
    ShowShell(&'static str, &'static str),
    /// Run the command ourselves with the terminal attached.
    Run(CommandTemplate),
}

/// Values placeholders are filled from.
#[derive(Debug, Clone, Copy)]
pub struct ScriptContext<'a> {
    pub program: &'a Path,
    pub repo: Option<&'a Path>,
    pub search_path: Option<&'a SearchPath>,
}

impl ScriptContext<'_> {
    pub fn render(&self, template: CommandTemplate) -> Invocation {
        let args = template.iter().map(|arg| match arg {
            Arg::Lit(s) => (*s).to_owned(),
            Arg::RepoPath => self.repo.map(|p| p.display().to_string()).unwrap_or_else(|| ".".to_owned()),
            Arg::SampleName => SAMPLE_NAME.to_owned(),
        });
        Invocation::new(self.program, args).with_search_path(self.search_path.cloned())
    }
}

pub fn play(
    steps: &[Step],
    ctx: &ScriptContext<'_>,
    operator: &mut dyn Operator,
    runner: &mut dyn Runner,
) -> Result<(), TourError> {
    for step in steps {
        match *step {
            Step::Say(text) => operator.say(text),
            Step::Quote(text) => operator.say(&report::quote(text)),
            Step::Pause(prompt) => operator.pause(prompt.unwrap_or(CONTINUE))?,
            Step::Show(text, template) => {
                let shown = report::command(&ctx.render(template).to_string());
                operator.say(&text.replace("{command}", &shown));
            }
            Step::ShowShell(text, line) => {
                let repo = ctx.repo.map(|p| p.display().to_string()).unwrap_or_else(|| ".".to_owned());
                let shown = report::command(&line.replace("{repo}", &shell_word(&repo)));
                operator.say(&text.replace("{command}", &shown));
            }
            Step::Run(template) => {
                let invocation = ctx.render(template);
                operator.say(&format!("Running: {}", report::command(&invocation.to_string())));
                runner.run(&invocation)?;
            }
        }
    }
    Ok(())
}

pub const LOGIN: CommandTemplate = &[Arg::Lit("login")];
pub const CREDITS_REMAINING: CommandTemplate = &[Arg::Lit("billing"), Arg::Lit("credits-remaining")];

pub static LOGIN_SCRIPT: &[Step] = &[
    Step::Say("First, let's log you in to the Bismuth platform."),
    Step::Run(LOGIN),
    Step::Say(""),
];

pub static REFILL_SCRIPT: &[Step] = &[
    Step::Pause(Some("Press Enter to open the purchase page.")),
    Step::Run(&[Arg::Lit("billing"), Arg::Lit("refill")]),
];

pub static SAMPLE_SCRIPT: &[Step] = &[
    Step::Say("👉 In another terminal, let's run the project to see what we're working with."),
    Step::ShowShell("Run {command} and go to the URL it prints.", "cd {repo} && npm i && npm run dev"),
    Step::Pause(None),
    Step::Say("This is a simple TODO app that we'll have Bismuth extend for us."),
    Step::Say("💡 Fun fact: Bismuth actually created this project from scratch in a single message!"),
    Step::Say(""),
    Step::Say("👉 Now, let's import the repository to Bismuth."),
    Step::Show("Run {command} in another terminal.", &[Arg::Lit("import"), Arg::RepoPath, Arg::Lit("--upload")]),
    Step::Pause(None),
    Step::Say(""),
    Step::Say("👉 Now let's start working with Bismuth."),
    Step::Show("In another terminal, open the chat interface: {command}", &[Arg::Lit("chat"), Arg::Lit("--repo"), Arg::RepoPath]),
    Step::Pause(None),
    Step::Say("We're first going to ask Bismuth to add a feature. Send this message:"),
    Step::Quote(
        "Hey Bismuth, I need you to add the ability to set due dates on tasks. The date set on a task should be shown in a smaller font and must be on a new line below the title. If a task is past its due date, the task title should be shown in red. Also make sure the date selection box is the same height as the title input and has the same padding.",
    ),
    Step::Say("Bismuth will now plan out how to complete the task, collect relevant information from the repository, and finally begin working."),
    Step::Say("And Bismuth works all on its own so you can go grab a cup of coffee while this finishes! ☕️"),
    Step::Say("💡 In the default 'Full' mode, Bismuth will always write code when you message it and won't respond to simple conversational chat."),
    Step::Pause(Some("Press Enter once Bismuth is showing you a diff.")),
    Step::Say(""),
    Step::Say("👉 Bismuth is now showing you the diff of the code it wrote. Press y in the chat terminal to accept the changes."),
    Step::Say("Now, let's check Bismuth's work. Go back to the running app, refresh the page, and test the new date selection feature."),
    Step::Say("If there is an issue, just ask Bismuth to fix it!"),
    Step::Pause(None),
    Step::Say(""),
    Step::Say("👉 Now let's have Bismuth fix an intentionally placed bug."),
    Step::Say("Open src/App.tsx and delete the"),
    Step::Say("    saveTasks(updatedTasks);"),
    Step::Say("line in handleToggleTask (around line 27)."),
    Step::Pause(None),
    Step::Say("Now tell Bismuth:"),
    Step::Quote("It looks like task toggle state is not saved between page refreshes. Can you double check the saving logic in App.tsx?"),
    Step::Pause(Some("Press Enter once Bismuth is showing you the diff.")),
    Step::Say(""),
    Step::Say("Examine the diff, press y to accept, and check Bismuth's work again. Go back to the app, refresh, and ensure that marking a task done is persisted between refreshes."),
    Step::Pause(None),
    Step::Say(""),
    Step::Say("👉 Finally, let's clean up the project."),
    Step::Show(
        "Exit the Bismuth chat interface by hitting Ctrl+C, kill the node development server, and run {command} to delete the project from Bismuth.",
        &[Arg::Lit("project"), Arg::Lit("delete"), Arg::SampleName],
    ),
    Step::Pause(None),
    Step::Say(""),
    Step::Say("🚀 And that's it!"),
    Step::Say("Bismuth can be used on much more than JavaScript frontends."),
    Step::Say("Use it to refactor Java webservers, write Python backends, or even create utility programs in C."),
    Step::Say("Now let's pick one of your projects to work on."),
];

pub static IMPORT_SCRIPT: &[Step] = &[Step::Run(&[Arg::Lit("import"), Arg::RepoPath])];

pub static CHAT_SCRIPT: &[Step] = &[
    Step::Say("💡 Use the '/help' command in chat for more information, or '/feedback' to send us feedback or report a bug."),
    Step::Pause(Some("Press Enter to start chatting.")),
    Step::Run(&[Arg::Lit("chat"), Arg::Lit("--repo"), Arg::RepoPath]),
];
