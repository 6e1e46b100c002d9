mod prelude;

mod generate;

pub(crate) fn get_commands() -> Vec<prelude::Command> {
    vec![generate::generate()]
}
