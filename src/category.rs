//! This file defines the `Category` type, the types needed to create a category
//! and the API routes for the category type.
//! A category partitions transactions within a kind (income or expense).

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_CONTAINER_STYLE,
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    transaction::TransactionKind,
};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alias for the integer type used for category database IDs.
pub type CategoryId = i64;

/// A category for grouping transactions within a kind, e.g., 'Groceries',
/// 'Eating Out' for expenses or 'Wages' for income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,

    /// The name of the category.
    pub name: CategoryName,

    /// The transaction kind this category applies to.
    pub kind: TransactionKind,
}

fn kind_radio_group(selected: TransactionKind) -> Markup {
    html! {
        div class=(FORM_RADIO_GROUP_STYLE)
        {
            @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                label class="flex items-center gap-2 flex-1"
                {
                    input
                        type="radio"
                        name="kind"
                        value=(kind.as_str())
                        checked[kind == selected]
                        class=(FORM_RADIO_INPUT_STYLE);

                    span class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                }
            }
        }
    }
}

fn category_form_view(
    hx_attr: (&str, &str),
    name: &str,
    kind: TransactionKind,
    submit_label: &str,
    error_message: &str,
) -> Markup {
    let (attr_name, attr_value) = hx_attr;

    html! {
        form
            // maud has no syntax for computed attribute names, so the
            // hx-post/hx-put attribute is spelled out per branch.
            hx-post=[(attr_name == "hx-post").then_some(attr_value)]
            hx-put=[(attr_name == "hx-put").then_some(attr_value)]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label class=(FORM_LABEL_STYLE) { "Kind" }
                (kind_radio_group(kind))
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

fn new_category_view(error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let form = category_form_view(
        ("hx-post", endpoints::POST_CATEGORY),
        "",
        TransactionKind::Expense,
        "Create Category",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &[], &content)
}

fn edit_category_view(
    update_endpoint: &str,
    name: &str,
    kind: TransactionKind,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let form = category_form_view(
        ("hx-put", update_endpoint),
        name,
        kind,
        "Update Category",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", &[], &content)
}

fn categories_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-2xl justify-between items-center mb-4"
            {
                h2 class="text-xl font-bold" { "Categories" }

                a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "New Category" }
            }

            @if categories.is_empty() {
                p
                {
                    "No categories yet. Create one to start organising your transactions."
                }
            } @else {
                div class="w-full max-w-2xl overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }
                        tbody
                        {
                            @for category in categories {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                                    }
                                    td class=(TABLE_CELL_STYLE) { (category.kind.label()) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        a
                                            href=(endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id))
                                            class=(LINK_STYLE)
                                        {
                                            "Edit"
                                        }

                                        " "

                                        button
                                            hx-delete=(endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id))
                                            hx-confirm="Delete this category? Its transactions will become uncategorised."
                                            hx-target="closest tr"
                                            hx-swap="outerHTML"
                                            hx-target-error="#alert-container"
                                            class=(BUTTON_DELETE_STYLE)
                                        {
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Categories", &[], &content)
}

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for the edit category page.
#[derive(Debug, Clone)]
pub struct EditCategoryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub kind: TransactionKind,
}

/// Route handler for the categories listing page.
pub async fn get_categories_page(State(state): State<CategoriesPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

/// Route handler for the new category page.
pub async fn get_new_category_page() -> Response {
    new_category_view("").into_response()
}

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Form(new_category): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&new_category.name) {
        Ok(name) => name,
        Err(error) => {
            return new_category_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category(name, new_category.kind, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateCategoryName(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

/// Route handler for the edit category page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);

    match get_category(category_id, &connection) {
        Ok(category) => Ok(edit_category_view(
            &update_endpoint,
            category.name.as_ref(),
            category.kind,
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Category not found",
                _ => {
                    tracing::error!("Failed to retrieve category {category_id}: {error}");
                    "Failed to load category"
                }
            };

            Ok(edit_category_view(
                &update_endpoint,
                "",
                TransactionKind::Expense,
                error_message,
            )
            .into_response())
        }
    }
}

/// A route handler for updating a category.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UpdateCategoryEndpointState>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);

    let name = match CategoryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return category_form_view(
                ("hx-put", &update_endpoint),
                &form_data.name,
                form_data.kind,
                "Update Category",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match update_category(category_id, name, form_data.kind, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingCategory) => Error::UpdateMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting a category.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Category deleted successfully".to_owned(),
            details: String::new(),
        }
        .into_response(),
        Err(Error::DeleteMissingCategory) => Error::DeleteMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

/// Create a category in the database.
///
/// # Errors
/// This function will return a [Error::DuplicateCategoryName] if a category
/// with `name` already exists, or [Error::SqlError] if there is some other
/// SQL error.
pub fn create_category(
    name: CategoryName,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, kind) VALUES (?1, ?2);",
            (name.as_ref(), kind),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve the category with `category_id` from the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Update a category's name and kind in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error or if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    new_kind: TransactionKind,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, kind = ?2 WHERE id = ?3",
        (new_name.as_ref(), new_kind, category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category from the database.
///
/// Transactions referencing the category keep existing; their category
/// reference is cleared and they fall back to the "Other" label in reports.
///
/// # Errors
/// This function will return an error if there is an SQL error or if the category doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Retrieve all categories in the database, ordered alphabetically by name.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}






#[cfg(test)]
mod edit_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use rusqlite::Connection;
    use scraper::{ElementRef, Html};

    use crate::{
        category::{
            CategoryName, create_category, get_edit_category_page, update_category_endpoint,
        },
        endpoints,
        transaction::TransactionKind,
    };

    use super::{
        CategoryFormData, EditCategoryPageState, UpdateCategoryEndpointState,
        create_category_table,
    };

    fn get_edit_category_state() -> EditCategoryPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_table(&connection).expect("Could not create category table");

        EditCategoryPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_update_category_state() -> UpdateCategoryEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_table(&connection).expect("Could not create category table");

        UpdateCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn get_edit_category_page_succeeds() {
        let state = get_edit_category_state();
        let category_name = CategoryName::new_unchecked("Test Category");
        let category = create_category(
            category_name.clone(),
            TransactionKind::Expense,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");

        let response = get_edit_category_page(Path(category.id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_CATEGORY, category.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", category_name.as_ref());
    }

    #[tokio::test]
    async fn get_edit_category_page_with_invalid_id_shows_error() {
        let state = get_edit_category_state();
        let invalid_id = 999999;

        let response = get_edit_category_page(Path(invalid_id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_error_message(&form, "Category not found");
    }

    #[tokio::test]
    async fn update_category_endpoint_succeeds() {
        let state = get_update_category_state();
        let original_name = CategoryName::new_unchecked("Original");
        let category = create_category(
            original_name,
            TransactionKind::Expense,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");

        let form = CategoryFormData {
            name: "Updated".to_string(),
            kind: TransactionKind::Expense,
        };

        let response = update_category_endpoint(Path(category.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
    }

    #[tokio::test]
    async fn update_category_endpoint_with_invalid_id_returns_not_found() {
        let state = get_update_category_state();
        let invalid_id = 999999;
        let form = CategoryFormData {
            name: "Updated".to_string(),
            kind: TransactionKind::Expense,
        };

        let response = update_category_endpoint(Path(invalid_id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors {:?} for HTML {}",
            html.errors,
            html.html()
        );
    }

    #[track_caller]
    fn must_get_form(html: &Html) -> ElementRef<'_> {
        html.select(&scraper::Selector::parse("form").unwrap())
            .next()
            .expect("No form found")
    }

    #[track_caller]
    fn assert_hx_endpoint(form: &ElementRef, endpoint: &str, attribute: &str) {
        let hx_attr = form
            .value()
            .attr(attribute)
            .unwrap_or_else(|| panic!("{attribute} attribute missing"));

        assert_eq!(
            hx_attr, endpoint,
            "want form with attribute {attribute}=\"{endpoint}\", got {hx_attr:?}"
        );
    }

    #[track_caller]
    fn assert_form_input_with_value(form: &ElementRef, name: &str, type_: &str, value: &str) {
        for input in form.select(&scraper::Selector::parse("input").unwrap()) {
            let input_name = input.value().attr("name").unwrap_or_default();

            if input_name == name {
                let input_type = input.value().attr("type").unwrap_or_default();
                let input_value = input.value().attr("value").unwrap_or_default();

                assert_eq!(
                    input_type, type_,
                    "want input with type \"{type_}\", got {input_type:?}"
                );

                assert_eq!(
                    input_value, value,
                    "want input with value \"{value}\", got {input_value:?}"
                );

                return;
            }
        }

        panic!("No input found with name \"{name}\", type \"{type_}\", and value \"{value}\"");
    }

    #[track_caller]
    fn assert_error_message(form: &ElementRef, want_error_message: &str) {
        let p = scraper::Selector::parse("p").unwrap();
        let error_message = form
            .select(&p)
            .next()
            .expect("No error message found")
            .text()
            .collect::<Vec<_>>()
            .join("");
        let got_error_message = error_message.trim();

        assert_eq!(want_error_message, got_error_message);
    }

    #[track_caller]
    fn assert_hx_redirect(response: &Response, endpoint: &str) {
        assert_eq!(get_header(response, "hx-redirect"), endpoint);
    }

    #[track_caller]
    fn get_header(response: &Response, header_name: &str) -> String {
        let header_error_message = format!("Headers missing {header_name}");

        response
            .headers()
            .get(header_name)
            .expect(&header_error_message)
            .to_str()
            .expect("Could not convert to str")
            .to_string()
    }
}
