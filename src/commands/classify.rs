use anyhow::Result;
use clap::Args;
use resolver::{MatchedForm, classify};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Variable query, taken as written (no variable interpolation)
    query: String,
}

impl ClassifyArgs {
    pub fn run(self) -> Result<()> {
        println!("{}", describe(classify(&self.query).as_ref()));
        Ok(())
    }
}

fn describe(form: Option<&MatchedForm>) -> String {
    match form {
        Some(form) => form.to_string(),
        None => "no form matched; resolves to no options".to_string(),
    }
}
