//! HTML rendering for the ledger page and the edit form.

use maud::{Markup, html};
use time::UtcOffset;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    view_model::{calculate_total, format_currency, format_currency_value, format_date},
};

use super::Transaction;

/// The max number of graphemes to display for a giver or receiver name
/// before truncating and displaying an ellipsis.
const MAX_NAME_GRAPHEMES: usize = 24;

fn truncate_name(name: &str) -> String {
    let graphemes: Vec<&str> = name.graphemes(true).collect();

    if graphemes.len() <= MAX_NAME_GRAPHEMES {
        name.to_owned()
    } else {
        format!("{}…", graphemes[..MAX_NAME_GRAPHEMES].concat())
    }
}

/// The form for recording a new transaction. Anyone may submit it.
fn record_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            class="stacked"
        {
            div
            {
                label for="giver" { "Giver" }
                input type="text" name="giver" id="giver" placeholder="Who gave the money?" required;
            }

            div
            {
                label for="receiver" { "Receiver" }
                input type="text" name="receiver" id="receiver" placeholder="Who received it?" required;
            }

            div
            {
                label for="amount" { "Amount (৳)" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    min="0"
                    step="0.01"
                    placeholder="0.00"
                    required;
            }

            button type="submit" { "Record" }
        }
    }
}

fn transaction_row(transaction: &Transaction, is_admin: bool, local_offset: UtcOffset) -> Markup {
    html! {
        tr
        {
            td { (format_date(&transaction.date, local_offset)) }
            td { (truncate_name(&transaction.giver)) }
            td { (truncate_name(&transaction.receiver)) }
            td { (format_currency(&transaction.amount)) }

            @if is_admin
            {
                td
                {
                    a href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id))
                    {
                        "Edit"
                    }

                    " "

                    button
                        class="link"
                        hx-delete=(format_endpoint(endpoints::TRANSACTION, &transaction.id))
                        hx-confirm="Delete this transaction? This cannot be undone."
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// The full ledger page: the record form, the transaction table and the
/// running total.
pub(crate) fn transactions_view(
    transactions: &[Transaction],
    is_admin: bool,
    local_offset: UtcOffset,
) -> Markup {
    let total = calculate_total(transactions);
    let action_columns = if is_admin { 1 } else { 0 };

    html! {
        h1 { "Money Receipt Tracker" }

        section
        {
            h2 { "Record a transaction" }

            (record_form())
        }

        section
        {
            h2 { "Transactions" }

            @if transactions.is_empty()
            {
                p class="empty-state" { "No transactions recorded yet." }
            }
            @else
            {
                table
                {
                    thead
                    {
                        tr
                        {
                            th { "Date" }
                            th { "Giver" }
                            th { "Receiver" }
                            th { "Amount" }

                            @if is_admin { th { "Actions" } }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions
                        {
                            (transaction_row(transaction, is_admin, local_offset))
                        }
                    }

                    tfoot
                    {
                        tr
                        {
                            td colspan="3" { "Total" }
                            td colspan=(1 + action_columns) { (format_currency_value(total)) }
                        }
                    }
                }
            }
        }

        footer
        {
            @if is_admin
            {
                a href=(endpoints::LOG_OUT) { "Log out" }
            }
            @else
            {
                a href=(endpoints::LOG_IN_VIEW) { "Admin log in" }
            }
        }
    }
}

/// The form for editing an existing transaction.
///
/// The stored date rides along in a hidden input so an edit preserves it.
pub(crate) fn edit_transaction_view(transaction: &Transaction) -> Markup {
    html! {
        h1 { "Edit transaction" }

        form
            hx-put=(format_endpoint(endpoints::TRANSACTION, &transaction.id))
            hx-target-error="#alert-container"
            class="stacked"
        {
            input type="hidden" name="date" value=(transaction.date);

            div
            {
                label for="giver" { "Giver" }
                input type="text" name="giver" id="giver" value=(transaction.giver) required;
            }

            div
            {
                label for="receiver" { "Receiver" }
                input type="text" name="receiver" id="receiver" value=(transaction.receiver) required;
            }

            div
            {
                label for="amount" { "Amount (৳)" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    min="0"
                    step="0.01"
                    value=(transaction.amount)
                    required;
            }

            button type="submit" { "Save changes" }
        }

        p { a href=(endpoints::ROOT) { "Back to the ledger" } }
    }
}
