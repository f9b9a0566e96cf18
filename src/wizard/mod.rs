//! The wizard: interview, classify, fill packages, draft the workflow

pub mod interview;

pub use interview::{ask_questions, format_answers, Answer, Question, BASIC_QUESTIONS};

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::agent::{
    prompts, Agent, BusinessClassification, BusinessType, PackageInputsTurn, WorkflowTurn,
};
use crate::conversation::{run_loop, Console, InputPolicy, Opening};
use crate::error::{Result, WizardError};
use crate::llm::ChatModel;
use crate::packages::{PackageInfo, PackageRole, PackageSet};
use crate::workflow::{self, FilledPackage};

const FILL_OPENING: &str = "Ask about the package inputs";
const DRAFT_OPENING: &str = "Show me the workflow.";

/// Everything the wizard produced
#[derive(Debug, Clone, Serialize)]
pub struct WizardResult {
    pub business_info: String,
    pub business_type: BusinessType,
    pub packages: Vec<FilledPackage>,
    pub package_calls: String,
    pub workflow: String,
}

impl WizardResult {
    /// Plain-text summary of the run
    pub fn summary(&self) -> String {
        format!("Business INFO:{}\nFlujo:{}", self.business_info, self.workflow)
    }
}

/// Which packages a business type is filled with, in workflow order
pub fn roles_for(business_type: BusinessType) -> &'static [PackageRole] {
    match business_type {
        BusinessType::ECommerce => &[PackageRole::ConversationalFlow, PackageRole::PaymentMethod],
        BusinessType::Informative | BusinessType::Other => &[PackageRole::ConversationalFlow],
    }
}

/// Drives one wizard run against a model and a console
pub struct Wizard<'a> {
    model: &'a dyn ChatModel,
    console: &'a mut dyn Console,
}

impl<'a> Wizard<'a> {
    pub fn new(model: &'a dyn ChatModel, console: &'a mut dyn Console) -> Self {
        Self { model, console }
    }

    /// Run the whole wizard. With `transcript`, the interview is skipped and
    /// the text is used as the business description.
    pub fn run(&mut self, packages: &PackageSet, transcript: Option<String>) -> Result<WizardResult> {
        let business_info = match transcript {
            Some(text) => text,
            None => self.basic_business_info()?,
        };
        if business_info.trim().is_empty() {
            return Err(WizardError::InvalidArgument(
                "business description is empty".to_string(),
            ));
        }

        let business_type = self.classify(&business_info)?;
        info!(%business_type, "business classified");
        self.console
            .notice(&format!("Tipo de negocio: {business_type}"));

        let to_fill: Vec<&PackageInfo> = roles_for(business_type)
            .iter()
            .map(|role| packages.get(*role))
            .collect();
        let filled = self.fill_packages(&to_fill)?;

        let package_calls = match business_type {
            BusinessType::ECommerce => workflow::assemble(Some(packages.database.name.as_str()), &filled),
            _ => workflow::assemble(None, &filled),
        };

        let workflow = self.draft_workflow(business_type, &business_info, &package_calls)?;

        Ok(WizardResult {
            business_info,
            business_type,
            packages: filled,
            package_calls,
            workflow: workflow.business_workflow,
        })
    }

    /// Interview the owner with the basic question set
    pub fn basic_business_info(&mut self) -> Result<String> {
        self.console
            .say(&"Vamos a conocer tu negocio.".bold().to_string());
        let answers = ask_questions(self.model, self.console, BASIC_QUESTIONS)?;
        Ok(format_answers(&answers))
    }

    /// Single exchange with the classifier; the category is trusted as-is
    pub fn classify(&mut self, business_info: &str) -> Result<BusinessType> {
        let mut agent: Agent<BusinessClassification> =
            Agent::new(self.model, prompts::classifier());
        let classification = agent.send(business_info)?;
        Ok(classification.business_type)
    }

    /// Fill one package's inputs until they are complete and confirmed
    pub fn fill_package(&mut self, package: &PackageInfo) -> Result<FilledPackage> {
        self.console
            .notice(&format!("Paquete: {}", package.name));
        let mut agent: Agent<PackageInputsTurn> =
            Agent::new(self.model, prompts::package_filler(package));

        let turn = run_loop(
            &mut agent,
            self.console,
            Opening::Instruct(FILL_OPENING),
            InputPolicy::Required,
            PackageInputsTurn::is_complete,
        )?
        .into_response()
        .ok_or_else(|| WizardError::protocol("package filling ended without a result"))?;

        Ok(FilledPackage::from_turn(package, turn))
    }

    /// Fill packages in order
    pub fn fill_packages(&mut self, packages: &[&PackageInfo]) -> Result<Vec<FilledPackage>> {
        packages
            .iter()
            .map(|package| self.fill_package(package))
            .collect()
    }

    /// Draft the workflow and iterate until the owner confirms it
    pub fn draft_workflow(
        &mut self,
        business_type: BusinessType,
        business_info: &str,
        package_calls: &str,
    ) -> Result<WorkflowTurn> {
        let system = match business_type {
            BusinessType::ECommerce => prompts::ecommerce_workflow(business_info, package_calls),
            _ => prompts::informative_workflow(business_info, package_calls),
        };
        let mut agent: Agent<WorkflowTurn> = Agent::new(self.model, system);

        run_loop(
            &mut agent,
            self.console,
            Opening::Instruct(DRAFT_OPENING),
            InputPolicy::Required,
            |turn: &WorkflowTurn| turn.user_confirmed,
        )?
        .into_response()
        .ok_or_else(|| WizardError::protocol("workflow drafting ended without a result"))
    }
}
