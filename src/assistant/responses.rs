//! Canned replies picked by keywords in the user's message.

const SAVINGS_REPLY: &str = "Here are three places to look for savings:\n\n\
1. Subscriptions: cancel the ones you have not used in the last month.\n\
2. Dining: cooking a couple more meals at home each week adds up quickly.\n\
3. Shopping: set a monthly budget for Shopping and check it on the Budgets page.\n\n\
Your Dashboard shows which categories take the largest share of your spending, \
which is a good place to start.";

const INVESTING_REPLY: &str = "A few principles for investing more:\n\n\
- Build an emergency fund of three to six months of expenses first.\n\
- Make the most of any employer contribution matching.\n\
- Prefer low-cost, diversified index funds over picking individual shares.\n\
- Invest a fixed amount each month so you do not have to time the market.\n\n\
Match the mix of investments to your risk tolerance and how long until you need the money.";

const BUDGETING_REPLY: &str = "A simple framework is the 50/30/20 rule:\n\n\
- 50% of income on needs: housing, utilities and groceries.\n\
- 30% on wants: entertainment, dining out and shopping.\n\
- 20% on savings and paying down debt.\n\n\
Set a monthly limit for each expense category on the Budgets page and you will be \
warned when you reach 80% of a limit.";

const GOALS_REPLY: &str = "To make progress on several goals at once:\n\n\
1. Put your emergency fund first, it protects every other goal.\n\
2. Give each goal a target amount and date, then work out the monthly amount needed.\n\
3. Automate those amounts as recurring transactions so they happen without thinking.\n\n\
If a goal falls behind, move money from the category where you overspend the most.";

const DEFAULT_REPLY: &str = "I can help with budgeting, investing, setting goals and finding \
ways to save money. What would you like to focus on first?";

/// The questions offered as one-click buttons before the conversation starts.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "How can I save more money?",
    "Should I invest more?",
    "Help me budget better",
    "Optimize my goals",
];

/// Pick a reply for `message`.
///
/// Keywords are matched case-insensitively in the order savings ("save" or
/// "money"), investing, budgeting and then goals, so a message mentioning
/// more than one topic gets the reply for the first.
pub fn respond(message: &str) -> &'static str {
    let message = message.to_lowercase();

    if message.contains("save") || message.contains("money") {
        SAVINGS_REPLY
    } else if message.contains("invest") {
        INVESTING_REPLY
    } else if message.contains("budget") {
        BUDGETING_REPLY
    } else if message.contains("goal") {
        GOALS_REPLY
    } else {
        DEFAULT_REPLY
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BUDGETING_REPLY, DEFAULT_REPLY, GOALS_REPLY, INVESTING_REPLY, QUICK_QUESTIONS,
        SAVINGS_REPLY, respond,
    };

    #[test]
    fn quick_questions_each_get_a_topic_reply() {
        let replies: Vec<_> = QUICK_QUESTIONS.iter().map(|question| respond(question)).collect();

        assert_eq!(
            replies,
            vec![SAVINGS_REPLY, INVESTING_REPLY, BUDGETING_REPLY, GOALS_REPLY]
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(respond("INVESTING in ETFs?"), INVESTING_REPLY);
        assert_eq!(respond("My Goals"), GOALS_REPLY);
    }

    #[test]
    fn earlier_topics_win() {
        assert_eq!(respond("Should I invest my money?"), SAVINGS_REPLY);
        assert_eq!(respond("Is investing part of a budget?"), INVESTING_REPLY);
        assert_eq!(respond("A budget for my goals"), BUDGETING_REPLY);
    }

    #[test]
    fn unknown_topics_get_default_reply() {
        assert_eq!(respond("hello"), DEFAULT_REPLY);
        assert_eq!(respond(""), DEFAULT_REPLY);
    }
}
