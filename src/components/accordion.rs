use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent};

use crate::config::AccordionConfig;
use crate::dom::{self, Surface};
use crate::error::SetupError;

const EXPANDED: &str = "aria-expanded";
const HIDDEN: &str = "hidden";

pub struct QaPair<E> {
    pub question: E,
    pub answer: E,
}

/// Question/answer disclosure with at most one pair expanded.
pub struct Accordion<E> {
    pairs: Vec<QaPair<E>>,
    expanded: Cell<Option<usize>>,
}

impl<E: Surface> Accordion<E> {
    /// Takes the initial state from `aria-expanded` in the markup. When more
    /// than one pair claims to be open the first one wins.
    pub fn new(pairs: Vec<QaPair<E>>) -> Self {
        let accordion = Self {
            pairs,
            expanded: Cell::new(None),
        };
        let open: Vec<usize> = accordion
            .pairs
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.question.attribute(EXPANDED).as_deref() == Some("true"))
            .map(|(index, _)| index)
            .collect();
        if let Some((first, rest)) = open.split_first() {
            accordion.expanded.set(Some(*first));
            for &index in rest {
                accordion.collapse(index);
            }
        }
        accordion
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded.get()
    }

    pub fn activate(&self, index: usize) {
        if index >= self.pairs.len() {
            return;
        }

        if self.expanded.get() == Some(index) {
            self.collapse(index);
            self.expanded.set(None);
            return;
        }

        for other in (0..self.pairs.len()).filter(|&other| other != index) {
            self.collapse(other);
        }
        self.expand(index);
        self.expanded.set(Some(index));
        debug!("Expanded question {}", index);
    }

    fn expand(&self, index: usize) {
        let pair = &self.pairs[index];
        pair.question.set_attribute(EXPANDED, "true");
        pair.answer.remove_attribute(HIDDEN);
    }

    fn collapse(&self, index: usize) {
        let pair = &self.pairs[index];
        pair.question.set_attribute(EXPANDED, "false");
        pair.answer.set_attribute(HIDDEN, "");
    }
}

fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

pub fn wire(document: &Document, config: &AccordionConfig) -> Result<(), SetupError> {
    let mut pairs = Vec::new();
    for item in dom::query_all(document, &config.item_selector)? {
        let question = dom::query_within(&item, &config.question_selector)?;
        let answer = dom::query_within(&item, &config.answer_selector)?;
        if let (Some(question), Some(answer)) = (question, answer) {
            pairs.push(QaPair { question, answer });
        }
    }
    if pairs.is_empty() {
        debug!("No question/answer pairs on this page");
        return Ok(());
    }

    let questions: Vec<HtmlElement> = pairs.iter().map(|pair| pair.question.clone()).collect();
    let accordion = Rc::new(Accordion::new(pairs));

    for (index, question) in questions.into_iter().enumerate() {
        let on_click = {
            let accordion = accordion.clone();
            Closure::wrap(Box::new(move |_: MouseEvent| {
                accordion.activate(index);
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        dom::listen(&question, "click", on_click)?;

        // Routed through click() so keyboard activation reaches every click
        // listener a pointer would.
        let control = question.clone();
        let on_key = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            if is_activation_key(&e.key()) {
                e.prevent_default();
                control.click();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        dom::listen(&question, "keydown", on_key)?;
    }

    debug!("Accordion wired with {} questions", accordion.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;

    type Pair = (Rc<FakeElement>, Rc<FakeElement>);

    fn pairs(count: usize) -> (Vec<Pair>, Accordion<Rc<FakeElement>>) {
        let elements: Vec<_> = (0..count)
            .map(|_| {
                (
                    Rc::new(FakeElement::new().with_attribute(EXPANDED, "false")),
                    Rc::new(FakeElement::new().with_attribute(HIDDEN, "")),
                )
            })
            .collect();
        let accordion = Accordion::new(
            elements
                .iter()
                .map(|(q, a)| QaPair { question: q.clone(), answer: a.clone() })
                .collect(),
        );
        (elements, accordion)
    }

    fn is_open(pair: &Pair) -> bool {
        let expanded = pair.0.attribute(EXPANDED).as_deref() == Some("true");
        let visible = pair.1.attribute(HIDDEN).is_none();
        assert_eq!(expanded, visible, "indicator and body disagree");
        expanded
    }

    #[test]
    fn expanding_one_collapses_the_other() {
        let (elements, accordion) = pairs(3);

        accordion.activate(0);
        assert!(is_open(&elements[0]));

        accordion.activate(1);
        assert!(!is_open(&elements[0]));
        assert!(is_open(&elements[1]));
        assert!(!is_open(&elements[2]));
        assert_eq!(accordion.expanded(), Some(1));
    }

    #[test]
    fn activating_the_open_pair_collapses_everything() {
        let (elements, accordion) = pairs(3);

        accordion.activate(1);
        accordion.activate(1);

        assert!(elements.iter().all(|pair| !is_open(pair)));
        assert_eq!(accordion.expanded(), None);
    }

    #[test]
    fn collapsing_leaves_other_pairs_untouched() {
        let (elements, accordion) = pairs(3);
        accordion.activate(2);
        let writes: Vec<usize> = elements.iter().map(|(q, a)| q.writes() + a.writes()).collect();

        accordion.activate(2);

        assert_eq!(elements[0].0.writes() + elements[0].1.writes(), writes[0]);
        assert_eq!(elements[1].0.writes() + elements[1].1.writes(), writes[1]);
    }

    #[test]
    fn at_most_one_open_after_any_sequence() {
        let (elements, accordion) = pairs(4);
        for index in [0, 3, 3, 1, 2, 2, 0, 1] {
            accordion.activate(index);
            let open = elements.iter().filter(|pair| is_open(pair)).count();
            assert!(open <= 1);
        }
    }

    #[test]
    fn markup_with_several_open_pairs_is_normalised() {
        let first = (
            Rc::new(FakeElement::new().with_attribute(EXPANDED, "true")),
            Rc::new(FakeElement::new()),
        );
        let second = (
            Rc::new(FakeElement::new().with_attribute(EXPANDED, "true")),
            Rc::new(FakeElement::new()),
        );
        let accordion = Accordion::new(vec![
            QaPair { question: first.0.clone(), answer: first.1.clone() },
            QaPair { question: second.0.clone(), answer: second.1.clone() },
        ]);

        assert_eq!(accordion.expanded(), Some(0));
        assert!(is_open(&first));
        assert!(!is_open(&second));
    }

    #[test]
    fn out_of_range_activation_is_ignored() {
        let (elements, accordion) = pairs(2);
        accordion.activate(5);
        assert_eq!(accordion.expanded(), None);
        assert!(elements.iter().all(|pair| !is_open(pair)));
    }

    #[test]
    fn enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Escape"));
        assert!(!is_activation_key("a"));
    }
}
