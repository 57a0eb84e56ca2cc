use crate::core::client::{read_json, AuthenticatedClient};
use crate::core::request::ApiRequest;
use crate::domain::model::{
    AccountEntryDto, AuthRequest, CategoryDto, CreateAccountEntryRequest, CreateCategoryRequest,
    MoneyFlowDto, MoneyFlowRequest, TokenPair, TokenResponse,
};
use crate::utils::error::Result;

/// Typed wrappers over the backend endpoints.
///
/// Each method only shapes the request and unwraps the body; credentials and
/// session refresh are handled by the underlying [`AuthenticatedClient`].
#[derive(Clone)]
pub struct BabloApi {
    client: AuthenticatedClient,
}

impl BabloApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    // Auth

    /// Creates the user. Does not log in.
    pub async fn register(&self, auth: &AuthRequest) -> Result<()> {
        self.client
            .send_empty(ApiRequest::post("/register").json(auth)?)
            .await
    }

    /// Logs in and stores the returned session.
    pub async fn login(&self, auth: &AuthRequest) -> Result<TokenPair> {
        let response = self
            .client
            .dispatch(ApiRequest::post("/login").json(auth)?)
            .await?;
        let tokens: TokenPair = read_json::<TokenResponse>(response).await?.into();

        self.client.store_session(&tokens).await?;
        tracing::info!("Logged in as {}", auth.email);
        Ok(tokens)
    }

    pub async fn logout(&self) -> Result<()> {
        self.client.clear_session().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    // Account

    pub async fn create_account(&self, basis_sum: f64) -> Result<()> {
        self.client
            .send_empty(ApiRequest::post("/account/create").query("basisSum", basis_sum))
            .await
    }

    pub async fn get_basis_sum(&self) -> Result<f64> {
        self.client
            .send_json(ApiRequest::get("/account/getbasissum"))
            .await
    }

    pub async fn update_account(&self, new_basis_sum: f64) -> Result<()> {
        self.client
            .send_empty(ApiRequest::put("/account/update").query("newBasisSum", new_basis_sum))
            .await
    }

    // Account entries

    pub async fn create_account_entry(
        &self,
        entry: &CreateAccountEntryRequest,
    ) -> Result<AccountEntryDto> {
        self.client
            .send_json(ApiRequest::post("/accountentry/create").json(entry)?)
            .await
    }

    /// Adjusts the entry's sign to its category, looking the category up
    /// among the user's expense and income categories. Uncategorized entries
    /// are returned without any request.
    pub async fn signed_entry(
        &self,
        entry: CreateAccountEntryRequest,
    ) -> Result<CreateAccountEntryRequest> {
        if entry.category_id.is_none() {
            return Ok(entry);
        }

        let expenses = self.get_expense_categories().await?;
        let incomes = self.get_income_categories().await?;
        let signed = entry.with_category_sign(&expenses, &incomes);
        tracing::debug!("Entry sum after category sign: {}", signed.sum);
        Ok(signed)
    }

    pub async fn get_account_entries(&self) -> Result<Vec<AccountEntryDto>> {
        self.client
            .send_json(ApiRequest::get("/accountentry/getall"))
            .await
    }

    pub async fn get_account_entry_by_id(&self, id: &str) -> Result<AccountEntryDto> {
        self.client
            .send_json(ApiRequest::get("/accountentry/getbyid").query("accountEntryId", id))
            .await
    }

    pub async fn update_account_entry(
        &self,
        id: &str,
        entry: &CreateAccountEntryRequest,
    ) -> Result<()> {
        let request = ApiRequest::put("/accountentry/update")
            .query("accountEntryId", id)
            .json(entry)?;
        self.client.send_empty(request).await
    }

    pub async fn delete_account_entry(&self, id: &str) -> Result<()> {
        self.client
            .send_empty(ApiRequest::delete("/accountentry/delete").query("accountEntryId", id))
            .await
    }

    // Money flows

    pub async fn create_money_flow(&self, flow: &MoneyFlowRequest) -> Result<MoneyFlowDto> {
        self.client
            .send_json(ApiRequest::post("/moneyflow/create").json(flow)?)
            .await
    }

    pub async fn get_money_flows(&self) -> Result<Vec<MoneyFlowDto>> {
        self.client
            .send_json(ApiRequest::get("/moneyflow/getall"))
            .await
    }

    pub async fn get_money_flow_by_id(&self, id: &str) -> Result<MoneyFlowDto> {
        self.client
            .send_json(ApiRequest::get("/moneyflow/getbyid").query("moneyFlowId", id))
            .await
    }

    pub async fn update_money_flow(&self, id: &str, flow: &MoneyFlowRequest) -> Result<()> {
        let request = ApiRequest::put("/moneyflow/update")
            .query("moneyFlowId", id)
            .json(flow)?;
        self.client.send_empty(request).await
    }

    pub async fn delete_money_flow(&self, id: &str) -> Result<()> {
        self.client
            .send_empty(ApiRequest::delete("/moneyflow/delete").query("moneyFlowId", id))
            .await
    }

    // Categories

    pub async fn create_category(&self, category: &CreateCategoryRequest) -> Result<CategoryDto> {
        self.client
            .send_json(ApiRequest::post("/category/create").json(category)?)
            .await
    }

    pub async fn get_income_categories(&self) -> Result<Vec<CategoryDto>> {
        self.client
            .send_json(ApiRequest::get("/category/getincome"))
            .await
    }

    pub async fn get_expense_categories(&self) -> Result<Vec<CategoryDto>> {
        self.client
            .send_json(ApiRequest::get("/category/getexpense"))
            .await
    }
}
