//! Suffix automaton (Blumer construction) over conversation text.
//!
//! Supports online extension and streaming longest-match queries, which is
//! all the dedup scorer needs: each turn is matched against the automaton
//! built from the turns before it, then appended.

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct State {
    len: usize,
    link: Option<usize>,
    trans: HashMap<char, usize>,
}

#[derive(Debug)]
pub struct SuffixAutomaton {
    states: Vec<State>,
    last: usize,
}

impl Default for SuffixAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixAutomaton {
    pub fn new() -> Self {
        Self {
            states: vec![State {
                len: 0,
                link: None,
                trans: HashMap::new(),
            }],
            last: 0,
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Append one character to the recognized string.
    pub fn extend(&mut self, c: char) {
        let cur = self.states.len();
        self.states.push(State {
            len: self.states[self.last].len + 1,
            link: None,
            trans: HashMap::new(),
        });

        let mut p = Some(self.last);
        while let Some(pi) = p {
            if self.states[pi].trans.contains_key(&c) {
                break;
            }
            self.states[pi].trans.insert(c, cur);
            p = self.states[pi].link;
        }

        match p {
            None => self.states[cur].link = Some(0),
            Some(pi) => {
                let q = self.states[pi].trans[&c];
                if self.states[pi].len + 1 == self.states[q].len {
                    self.states[cur].link = Some(q);
                } else {
                    let clone = self.states.len();
                    let cloned = State {
                        len: self.states[pi].len + 1,
                        link: self.states[q].link,
                        trans: self.states[q].trans.clone(),
                    };
                    self.states.push(cloned);

                    let mut pp = Some(pi);
                    while let Some(ppi) = pp {
                        if self.states[ppi].trans.get(&c) == Some(&q) {
                            self.states[ppi].trans.insert(c, clone);
                            pp = self.states[ppi].link;
                        } else {
                            break;
                        }
                    }

                    self.states[q].link = Some(clone);
                    self.states[cur].link = Some(clone);
                }
            }
        }

        self.last = cur;
    }

    pub fn extend_str(&mut self, text: &str) {
        for c in text.chars() {
            self.extend(c);
        }
    }

    /// For each character of `text`, the length of the longest substring
    /// ending there that occurs in the automaton's source string.
    pub fn match_lengths(&self, text: &str) -> Vec<usize> {
        let mut lengths = Vec::with_capacity(text.len());
        let mut cur = 0usize;
        let mut cur_len = 0usize;

        for c in text.chars() {
            while cur != 0 && !self.states[cur].trans.contains_key(&c) {
                cur = self.states[cur].link.unwrap_or(0);
                cur_len = self.states[cur].len;
            }
            if let Some(&next) = self.states[cur].trans.get(&c) {
                cur = next;
                cur_len += 1;
            } else {
                cur = 0;
                cur_len = 0;
            }
            lengths.push(cur_len);
        }

        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automaton_over(text: &str) -> SuffixAutomaton {
        let mut sa = SuffixAutomaton::new();
        sa.extend_str(text);
        sa
    }

    #[test]
    fn test_full_match_of_seen_text() {
        let sa = automaton_over("abcabxabcd");
        let lengths = sa.match_lengths("abc");
        assert_eq!(lengths, vec![1, 2, 3]);
    }

    #[test]
    fn test_unseen_characters_reset() {
        let sa = automaton_over("hello world");
        let lengths = sa.match_lengths("zzhello");
        assert_eq!(lengths, vec![0, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_partial_overlap_tracks_longest_suffix() {
        let sa = automaton_over("abab");
        // "bab" is a substring; "babx" resets at x.
        assert_eq!(sa.match_lengths("babx"), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_empty_automaton_matches_nothing() {
        let sa = SuffixAutomaton::new();
        assert_eq!(sa.match_lengths("abc"), vec![0, 0, 0]);
    }
}
