//! The shared transaction form: multipart parsing for the create/edit
//! endpoints and the form view used by the create/edit pages.
//!
//! The form is multipart rather than urlencoded because it can carry a
//! receipt image alongside the transaction fields.

use axum::extract::Multipart;
use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::{
    Error,
    category::{Category, CategoryId},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    transaction::TransactionKind,
};

/// A receipt image uploaded with the transaction form.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ReceiptUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The parsed fields of the transaction form.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TransactionFormData {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub receipt: Option<ReceiptUpload>,
}

/// Parse the multipart transaction form.
///
/// An empty `category_id` field means no category, and a `receipt` part
/// without a file name or content is ignored (the browser sends one even when
/// the user picked no file).
///
/// # Errors
/// This function will return a:
/// - [Error::MultipartError] if the multipart stream cannot be read,
/// - [Error::MissingFormField] if a required field is absent,
/// - [Error::InvalidFormField] if a field cannot be parsed,
/// - or [Error::UnknownTransactionKind] if the kind is not income or expense.
pub(super) async fn parse_transaction_form(
    mut multipart: Multipart,
) -> Result<TransactionFormData, Error> {
    let mut kind = None;
    let mut amount = None;
    let mut date = None;
    let mut description = None;
    let mut category_id = None;
    let mut receipt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_owned();

        match field_name.as_str() {
            "kind" => {
                let text = read_text(field).await?;
                kind = Some(text.parse::<TransactionKind>()?);
            }
            "amount" => {
                let text = read_text(field).await?;
                amount = Some(
                    text.parse::<f64>()
                        .map_err(|_| Error::InvalidFormField("amount"))?,
                );
            }
            "date" => {
                let text = read_text(field).await?;
                date = Some(
                    Date::parse(&text, &format_description!("[year]-[month]-[day]"))
                        .map_err(|_| Error::InvalidFormField("date"))?,
                );
            }
            "description" => description = Some(read_text(field).await?),
            "category_id" => {
                let text = read_text(field).await?;
                category_id = if text.is_empty() {
                    None
                } else {
                    Some(
                        text.parse::<CategoryId>()
                            .map_err(|_| Error::InvalidFormField("category_id"))?,
                    )
                };
            }
            "receipt" => {
                let has_file_name = field
                    .file_name()
                    .map(|file_name| !file_name.is_empty())
                    .unwrap_or(false);
                let content_type = field.content_type().map(|content_type| content_type.to_owned());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;

                if has_file_name && !bytes.is_empty() {
                    receipt = Some(ReceiptUpload {
                        content_type: content_type
                            .ok_or(Error::InvalidFormField("receipt"))?,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(TransactionFormData {
        kind: kind.ok_or(Error::MissingFormField("kind"))?,
        amount: amount.ok_or(Error::MissingFormField("amount"))?,
        date: date.ok_or(Error::MissingFormField("date"))?,
        description: description.unwrap_or_default(),
        category_id,
        receipt,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))
}

/// Everything the transaction form view needs to render.
pub(super) struct TransactionFormContext<'a> {
    /// "hx-post" or "hx-put".
    pub hx_attribute: &'a str,
    /// The endpoint the form submits to.
    pub endpoint: &'a str,
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub date: Date,
    pub max_date: Date,
    pub description: &'a str,
    pub category_id: Option<CategoryId>,
    pub categories: &'a [Category],
    pub receipt_url: Option<&'a str>,
}

/// Renders the transaction form.
pub(super) fn transaction_form_view(context: &TransactionFormContext) -> Markup {
    html! {
        form
            hx-post=[(context.hx_attribute == "hx-post").then_some(context.endpoint)]
            hx-put=[(context.hx_attribute == "hx-put").then_some(context.endpoint)]
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label class=(FORM_LABEL_STYLE) { "Kind" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                        label class="flex items-center gap-2 flex-1"
                        {
                            input
                                type="radio"
                                name="kind"
                                value=(kind.as_str())
                                checked[kind == context.kind]
                                class=(FORM_RADIO_INPUT_STYLE);

                            span class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                        }
                    }
                }
            }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                div class="input-wrapper w-full"
                {
                    input
                        id="amount"
                        type="number"
                        name="amount"
                        min="0"
                        step="0.01"
                        value=[context.amount]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    id="date"
                    type="date"
                    name="date"
                    value=(context.date)
                    max=(context.max_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="What was this for?"
                    value=(context.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="category_id"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category"
                }

                select
                    id="category_id"
                    name="category_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[context.category_id.is_none()] { "Uncategorised" }

                    @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                        optgroup label=(kind.label())
                        {
                            @for category in context.categories.iter().filter(|category| category.kind == kind) {
                                option
                                    value=(category.id)
                                    selected[context.category_id == Some(category.id)]
                                {
                                    (category.name)
                                }
                            }
                        }
                    }
                }
            }

            div
            {
                label
                    for="receipt"
                    class=(FORM_LABEL_STYLE)
                {
                    "Receipt image"
                }

                input
                    id="receipt"
                    type="file"
                    name="receipt"
                    accept="image/jpeg,image/png,image/webp"
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(receipt_url) = context.receipt_url {
                    p class="mt-2 text-sm"
                    {
                        "Current receipt: "
                        a href=(receipt_url) class="underline" { "view" }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
        }
    }
}
