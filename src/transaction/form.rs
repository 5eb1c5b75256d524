//! The transaction entry form, and the partial that swaps the category options
//! when the transaction kind changes.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    category::TransactionKind,
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    recurrence::Frequency,
    transaction::NewTransaction,
};

/// The form data for creating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// One of the categories for `kind`.
    pub category: String,
    /// When the transaction ocurred.
    pub date: Date,
    /// Optional text detailing the transaction.
    #[serde(default)]
    pub note: Option<String>,
    /// Set by the "repeats" checkbox.
    #[serde(default)]
    pub is_recurring: bool,
    /// The frequency tag, e.g. "monthly".
    #[serde(default)]
    pub recurring_frequency: Option<String>,
}

/// The frequency used when "repeats" is ticked without choosing one.
const DEFAULT_FREQUENCY: Frequency = Frequency::Monthly;

impl TryFrom<TransactionForm> for NewTransaction {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        let recurring_frequency = match form.recurring_frequency.as_deref() {
            _ if !form.is_recurring => None,
            Some(tag) if !tag.is_empty() => Some(tag.parse::<Frequency>()?),
            _ => Some(DEFAULT_FREQUENCY),
        };

        Ok(NewTransaction {
            kind: form.kind,
            amount: form.amount,
            category: form.category,
            date: form.date,
            note: form.note,
            is_recurring: form.is_recurring,
            recurring_frequency,
        })
    }
}

/// The query for [get_category_options].
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// The kind selected in the form.
    pub kind: TransactionKind,
}

/// The `<option>` elements for the categories of `kind`.
pub fn category_options(kind: TransactionKind) -> Markup {
    html! {
        @for category in kind.categories() {
            option value=(category) { (category) }
        }
    }
}

/// Route handler for the category options of the selected transaction kind.
pub async fn get_category_options(Query(query): Query<CategoryQuery>) -> Response {
    category_options(query.kind).into_response()
}

fn kind_radio(kind: TransactionKind, checked: bool) -> Markup {
    let id = format!("transaction-kind-{}", kind.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[checked]
                required
                tabindex="0"
                hx-get=(endpoints::CATEGORY_OPTIONS)
                hx-target="#category"
                hx-trigger="change"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
        }
    }
}

/// The inputs of the transaction form, defaulting to an expense dated `today`.
pub fn transaction_form_fields(today: Date) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (kind_radio(TransactionKind::Expense, true))
                (kind_radio(TransactionKind::Income, false))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                (category_options(TransactionKind::Expense))
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(today)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="note" class=(FORM_LABEL_STYLE) { "Note" }

            input
                name="note"
                id="note"
                type="text"
                placeholder="Optional"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="flex items-center gap-3"
        {
            input
                name="is_recurring"
                id="is_recurring"
                type="checkbox"
                value="true"
                class="h-4 w-4";

            label for="is_recurring" class="text-sm font-medium" { "This transaction repeats" }
        }

        div
        {
            label for="recurring_frequency" class=(FORM_LABEL_STYLE) { "Frequency" }

            select
                name="recurring_frequency"
                id="recurring_frequency"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for frequency in Frequency::ALL {
                    option
                        value=(frequency.as_str())
                        selected[frequency == DEFAULT_FREQUENCY]
                    {
                        (frequency.label())
                    }
                }
            }
        }
    }
}
