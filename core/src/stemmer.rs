//! Porter suffix-stripping stemmer.
//!
//! Porter, M.F. "An algorithm for suffix stripping." Program 14.3 (1980): 130-137,
//! following the published reference release, including its two boundary fixes
//! for words such as `aed` and a bare `ion`.
//!
//! The buffer is a `Vec<char>` so that non-ASCII input passes through unharmed;
//! anything that is not one of `a e i o u` (or a vowel-like `y`) counts as a consonant.

/// Stem a single lowercase token.
///
/// Words of one or two characters are returned unchanged.
pub fn stem(word: &str) -> String {
    let mut s = Stemmer::new(word);
    s.run();
    s.result()
}

struct Stemmer {
    b: Vec<char>,
    /// Last index of the active region.
    k: isize,
    /// Boundary set by `ends`; may be -1 when the suffix covers the whole word.
    j: isize,
}

impl Stemmer {
    fn new(word: &str) -> Self {
        let b: Vec<char> = word.chars().collect();
        let k = b.len() as isize - 1;
        Self { b, k, j: 0 }
    }

    fn run(&mut self) {
        if self.k > 1 {
            self.step1();
            self.step2();
            self.step3();
            self.step4();
            self.step5();
            self.step6();
        }
    }

    fn result(&self) -> String {
        self.b.iter().take((self.k + 1).max(0) as usize).collect()
    }

    #[inline]
    fn at(&self, i: isize) -> char {
        self.b[i as usize]
    }

    fn cons(&self, i: isize) -> bool {
        match self.at(i) {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.cons(i - 1),
            _ => true,
        }
    }

    /// Number of consonant sequences between 0 and j:
    /// `<c><v>` gives 0, `<c>vc<v>` gives 1, `<c>vcvc<v>` gives 2.
    fn m(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        loop {
            if i > self.j {
                return n;
            }
            if !self.cons(i) {
                break;
            }
            i += 1;
        }
        i += 1;
        loop {
            loop {
                if i > self.j {
                    return n;
                }
                if self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
            n += 1;
            loop {
                if i > self.j {
                    return n;
                }
                if !self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
        }
    }

    fn vowel_in_stem(&self) -> bool {
        (0..=self.j).any(|i| !self.cons(i))
    }

    fn double_c(&self, p: isize) -> bool {
        if p < 1 || self.at(p) != self.at(p - 1) {
            return false;
        }
        self.cons(p)
    }

    /// `p-2, p-1, p` is consonant-vowel-consonant and the last consonant is not w, x or y.
    fn cvc(&self, p: isize) -> bool {
        if p < 2 || !self.cons(p) || self.cons(p - 1) || !self.cons(p - 2) {
            return false;
        }
        !matches!(self.at(p), 'w' | 'x' | 'y')
    }

    fn ends(&mut self, suffix: &str) -> bool {
        let len = suffix.chars().count() as isize;
        let start = self.k - len + 1;
        if start < 0 {
            return false;
        }
        let matched = suffix
            .chars()
            .zip(self.b[start as usize..].iter())
            .all(|(a, &b)| a == b);
        if !matched {
            return false;
        }
        self.j = self.k - len;
        true
    }

    /// Replace `j+1..=k` with `s` and move `k` to its end.
    fn set_to(&mut self, s: &str) {
        self.b.truncate((self.j + 1) as usize);
        self.b.extend(s.chars());
        self.k = self.j + s.chars().count() as isize;
    }

    fn r(&mut self, s: &str) {
        if self.m() > 0 {
            self.set_to(s);
        }
    }

    /// Plurals and -ed / -ing.
    fn step1(&mut self) {
        if self.at(self.k) == 's' {
            if self.ends("sses") {
                self.k -= 2;
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.at(self.k - 1) != 's' {
                self.k -= 1;
            }
        }
        if self.ends("eed") {
            if self.m() > 0 {
                self.k -= 1;
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.k = self.j;
            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_c(self.k) {
                self.k -= 1;
                if matches!(self.at(self.k), 'l' | 's' | 'z') {
                    self.k += 1;
                }
            } else if self.m() == 1 && self.cvc(self.k) {
                self.set_to("e");
            }
        }
    }

    /// Terminal y to i when the stem has another vowel.
    fn step2(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            let k = self.k as usize;
            self.b[k] = 'i';
        }
    }

    /// Double suffixes to single ones, e.g. -ization to -ize.
    fn step3(&mut self) {
        if self.k == 0 {
            return;
        }
        const RULES: &[(char, &[(&str, &str)])] = &[
            ('a', &[("ational", "ate"), ("tional", "tion")]),
            ('c', &[("enci", "ence"), ("anci", "ance")]),
            ('e', &[("izer", "ize")]),
            ('l', &[("bli", "ble"), ("alli", "al"), ("entli", "ent"), ("eli", "e"), ("ousli", "ous")]),
            ('o', &[("ization", "ize"), ("ation", "ate"), ("ator", "ate")]),
            ('s', &[("alism", "al"), ("iveness", "ive"), ("fulness", "ful"), ("ousness", "ous")]),
            ('t', &[("aliti", "al"), ("iviti", "ive"), ("biliti", "ble")]),
            ('g', &[("logi", "log")]),
        ];
        let penultimate = self.at(self.k - 1);
        self.apply_first(RULES, penultimate);
    }

    /// -ic-, -full, -ness and friends.
    fn step4(&mut self) {
        const RULES: &[(char, &[(&str, &str)])] = &[
            ('e', &[("icate", "ic"), ("ative", ""), ("alize", "al")]),
            ('i', &[("iciti", "ic")]),
            ('l', &[("ical", "ic"), ("ful", "")]),
            ('s', &[("ness", "")]),
        ];
        let last = self.at(self.k);
        self.apply_first(RULES, last);
    }

    /// Within the group keyed by `key`, apply `r` for the first matching suffix.
    fn apply_first(&mut self, rules: &[(char, &[(&str, &str)])], key: char) {
        let Some((_, group)) = rules.iter().find(|(c, _)| *c == key) else {
            return;
        };
        for (suffix, replacement) in group.iter() {
            if self.ends(suffix) {
                self.r(replacement);
                return;
            }
        }
    }

    /// Strip -ant, -ence etc. in context `<c>vcvc<v>`.
    fn step5(&mut self) {
        if self.k == 0 {
            return;
        }
        let matched = match self.at(self.k - 1) {
            'a' => self.ends("al"),
            'c' => self.ends("ance") || self.ends("ence"),
            'e' => self.ends("er"),
            'i' => self.ends("ic"),
            'l' => self.ends("able") || self.ends("ible"),
            'n' => self.ends("ant") || self.ends("ement") || self.ends("ment") || self.ends("ent"),
            'o' => {
                (self.ends("ion") && self.j >= 0 && matches!(self.at(self.j), 's' | 't'))
                    || self.ends("ou")
            }
            's' => self.ends("ism"),
            't' => self.ends("ate") || self.ends("iti"),
            'u' => self.ends("ous"),
            'v' => self.ends("ive"),
            'z' => self.ends("ize"),
            _ => false,
        };
        if matched && self.m() > 1 {
            self.k = self.j;
        }
    }

    /// Final -e, and -ll to -l, when the measure allows it.
    fn step6(&mut self) {
        self.j = self.k;
        if self.at(self.k) == 'e' {
            let a = self.m();
            if a > 1 || (a == 1 && !self.cvc(self.k - 1)) {
                self.k -= 1;
            }
        }
        if self.at(self.k) == 'l' && self.double_c(self.k) && self.m() > 1 {
            self.k -= 1;
        }
    }
}
