use bablo_budget::config::cli::{
    AccountCommand, CategoryCommand, Command, Credentials, EntryArgs, EntryCommand, FlowArgs,
    FlowCommand,
};
use bablo_budget::domain::model::{
    AuthRequest, CreateAccountEntryRequest, CreateCategoryRequest, MoneyFlowRequest,
};
use bablo_budget::utils::logger;
use bablo_budget::utils::validation::{validate_non_empty_string, Validate};
use bablo_budget::{ApiError, AuthenticatedClient, BabloApi, CliConfig, ConfigProvider, FileSessionStore};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(cli: CliConfig) -> Result<(), ApiError> {
    let settings = cli.settings()?;
    tracing::debug!("Settings: {:?}", settings);

    let store = FileSessionStore::new(settings.session_path());
    let client = AuthenticatedClient::from_config(&settings, Arc::new(store))?;
    let api = BabloApi::new(client);

    match cli.command {
        Command::Register(credentials) => {
            api.register(&auth_request(credentials)?).await?;
            println!("✅ Registered. Run `bablo login` to start a session.");
        }
        Command::Login(credentials) => {
            api.login(&auth_request(credentials)?).await?;
            println!("✅ Logged in");
        }
        Command::Logout => {
            api.logout().await?;
            println!("✅ Logged out");
        }
        Command::Account(command) => run_account(&api, command).await?,
        Command::Entry(command) => run_entry(&api, command).await?,
        Command::Flow(command) => run_flow(&api, command).await?,
        Command::Category(command) => run_category(&api, command).await?,
    }

    Ok(())
}

async fn run_account(api: &BabloApi, command: AccountCommand) -> Result<(), ApiError> {
    match command {
        AccountCommand::Create { basis_sum } => {
            api.create_account(basis_sum).await?;
            println!("✅ Account created");
        }
        AccountCommand::Balance => print_json(&api.get_basis_sum().await?)?,
        AccountCommand::Update { new_basis_sum } => {
            api.update_account(new_basis_sum).await?;
            println!("✅ Balance updated");
        }
    }
    Ok(())
}

async fn run_entry(api: &BabloApi, command: EntryCommand) -> Result<(), ApiError> {
    match command {
        EntryCommand::List => print_json(&api.get_account_entries().await?)?,
        EntryCommand::Get { id } => print_json(&api.get_account_entry_by_id(&id).await?)?,
        EntryCommand::Create(args) => {
            let entry = api.signed_entry(entry_request(args)).await?;
            print_json(&api.create_account_entry(&entry).await?)?
        }
        EntryCommand::Update { id, entry } => {
            let entry = api.signed_entry(entry_request(entry)).await?;
            api.update_account_entry(&id, &entry).await?;
            println!("✅ Entry {} updated", id);
        }
        EntryCommand::Delete { id } => {
            api.delete_account_entry(&id).await?;
            println!("✅ Entry {} deleted", id);
        }
    }
    Ok(())
}

async fn run_flow(api: &BabloApi, command: FlowCommand) -> Result<(), ApiError> {
    match command {
        FlowCommand::List => print_json(&api.get_money_flows().await?)?,
        FlowCommand::Get { id } => {
            let flow = api.get_money_flow_by_id(&id).await?;
            tracing::info!("Flow {} repeats: {}", flow.id, flow.period_label());
            print_json(&flow)?
        }
        FlowCommand::Create(args) => print_json(&api.create_money_flow(&flow_request(args)).await?)?,
        FlowCommand::Update { id, flow } => {
            api.update_money_flow(&id, &flow_request(flow)).await?;
            println!("✅ Money flow {} updated", id);
        }
        FlowCommand::Delete { id } => {
            api.delete_money_flow(&id).await?;
            println!("✅ Money flow {} deleted", id);
        }
    }
    Ok(())
}

async fn run_category(api: &BabloApi, command: CategoryCommand) -> Result<(), ApiError> {
    match command {
        CategoryCommand::Income => print_json(&api.get_income_categories().await?)?,
        CategoryCommand::Expense => print_json(&api.get_expense_categories().await?)?,
        CategoryCommand::Create { name, kind } => {
            validate_non_empty_string("name", &name)?;
            let request = CreateCategoryRequest::new(name, kind.into());
            print_json(&api.create_category(&request).await?)?
        }
    }
    Ok(())
}

fn auth_request(credentials: Credentials) -> Result<AuthRequest, ApiError> {
    let auth = AuthRequest {
        email: credentials.email,
        password: credentials.password,
    };
    auth.validate()?;
    Ok(auth)
}

fn entry_request(args: EntryArgs) -> CreateAccountEntryRequest {
    CreateAccountEntryRequest {
        sum: args.sum,
        date: args.date,
        category_id: args.category,
    }
}

fn flow_request(args: FlowArgs) -> MoneyFlowRequest {
    MoneyFlowRequest {
        sum: args.sum,
        starting_date: args.start,
        period: args.period.into(),
        category_id: args.category,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ApiError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
