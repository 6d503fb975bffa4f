use macroquad::math::{vec2, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    Odysseus,
    Cyclops,
    SirenA,
    SirenB,
}

impl Speaker {
    pub fn display_name(self) -> &'static str {
        match self {
            Speaker::Odysseus => "Odysseus",
            Speaker::Cyclops => "Cyclops",
            Speaker::SirenA | Speaker::SirenB => "Siren",
        }
    }

    /// Logical asset name of the portrait shown beside the dialogue box.
    pub fn portrait(self) -> &'static str {
        match self {
            Speaker::Odysseus => "portrait_odysseus.png",
            Speaker::Cyclops => "portrait_cyclops.png",
            Speaker::SirenA => "portrait_siren_a.png",
            Speaker::SirenB => "portrait_siren_b.png",
        }
    }

    /// Where this speaker's portrait goes in a `screen`-sized view, for an
    /// image of `image` pixels. The image is scaled to fit its slot with the
    /// aspect ratio kept and stands on a line 140 px above the bottom edge.
    ///
    /// Odysseus takes the left half, the cyclops the right half. The sirens
    /// share the right half: the first next to the middle, the second at
    /// the edge.
    pub fn portrait_slot(self, image: Vec2, screen: Vec2) -> Rect {
        let max = match self {
            Speaker::Odysseus | Speaker::Cyclops => screen.x / 2.0 - 100.0,
            Speaker::SirenA | Speaker::SirenB => screen.x / 3.0 - 50.0,
        };
        let max = vec2(max, screen.y - 150.0);
        let ratio = if image.x > 0.0 && image.y > 0.0 {
            (max.x / image.x).min(max.y / image.y)
        } else {
            0.0
        };
        let size = (image * ratio).floor();
        let x = match self {
            Speaker::Odysseus => 50.0,
            Speaker::SirenA => screen.x / 2.0 + 20.0,
            Speaker::Cyclops | Speaker::SirenB => screen.x - size.x - 50.0,
        };
        Rect::new(x, screen.y - size.y - 140.0, size.x, size.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    Cyclops,
    Sirens,
}

const CYCLOPS_LINES: &[(Speaker, &str)] = &[
    (Speaker::Odysseus, "I am Odysseus, certified SCRUM MASTER, who are you creature?"),
    (Speaker::Cyclops, "I am a Java Addict, son of IDE god!"),
    (Speaker::Cyclops, "You haven't submitted your assignment on time... You will be my meal!"),
    (Speaker::Odysseus, "I will not be devoured without a fight!"),
    (
        Speaker::Odysseus,
        "I must escape from this Blackboard cave before she catches me and force me to do JAVA!",
    ),
];

const SIRENS_LINES: &[(Speaker, &str)] = &[
    (Speaker::SirenA, "Ohh... ARE YOU ALIVE ???"),
    (Speaker::SirenB, "Come my child, join us or else I'll Kirill you !"),
    (Speaker::Odysseus, "Your voices are enchanting, but I know your traps!"),
    (Speaker::SirenA, "We want you to stay with us..IS THAT CLEAR TO YOU?????"),
    (Speaker::Odysseus, "Never! I must find my way back to my coffee store!"),
    (Speaker::SirenB, "Then flee, mortal... If you can!"),
];

impl Scenario {
    pub fn lines(self) -> &'static [(Speaker, &'static str)] {
        match self {
            Scenario::Cyclops => CYCLOPS_LINES,
            Scenario::Sirens => SIRENS_LINES,
        }
    }
}

/// A fixed list of lines and a cursor into it.
#[derive(Clone, Debug)]
pub struct DialogueScript {
    pub scenario: Scenario,
    lines: &'static [(Speaker, &'static str)],
    cursor: usize,
}

impl DialogueScript {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            lines: scenario.lines(),
            cursor: 0,
        }
    }

    /// Move to the next line. Past the last line this does nothing.
    pub fn advance(&mut self) {
        if self.cursor < self.lines.len() {
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    pub fn current(&self) -> Option<(Speaker, &'static str)> {
        self.lines.get(self.cursor).copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(960.0, 640.0);

    #[test]
    fn finishes_after_exactly_len_advances() {
        for (scenario, n) in [(Scenario::Cyclops, 5), (Scenario::Sirens, 6)] {
            let mut script = DialogueScript::new(scenario);
            assert_eq!(script.len(), n);
            for i in 0..n {
                assert!(!script.is_finished(), "finished early at {i}");
                assert!(script.current().is_some());
                script.advance();
            }
            assert!(script.is_finished());
            assert_eq!(script.current(), None);
        }
    }

    #[test]
    fn extra_advances_are_ignored() {
        let mut script = DialogueScript::new(Scenario::Sirens);
        for _ in 0..script.len() + 5 {
            script.advance();
        }
        assert_eq!(script.cursor(), 6);
        assert!(script.is_finished());
    }

    #[test]
    fn scenarios_open_with_their_first_speaker() {
        let cyclops = DialogueScript::new(Scenario::Cyclops);
        assert_eq!(cyclops.current().map(|(s, _)| s), Some(Speaker::Odysseus));
        let sirens = DialogueScript::new(Scenario::Sirens);
        assert_eq!(sirens.current().map(|(s, _)| s), Some(Speaker::SirenA));
        assert_eq!(Speaker::SirenA.display_name(), Speaker::SirenB.display_name());
    }

    #[test]
    fn sirens_get_separate_portrait_slots() {
        let image = vec2(270.0, 490.0);
        let a = Speaker::SirenA.portrait_slot(image, SCREEN);
        let b = Speaker::SirenB.portrait_slot(image, SCREEN);
        assert_eq!(a, Rect::new(500.0, 10.0, 270.0, 490.0));
        assert_eq!(b, Rect::new(640.0, 10.0, 270.0, 490.0));
    }

    #[test]
    fn portraits_keep_their_aspect_ratio() {
        // a wide image is limited by the slot width
        let slot = Speaker::Odysseus.portrait_slot(vec2(760.0, 380.0), SCREEN);
        assert_eq!(slot, Rect::new(50.0, 310.0, 380.0, 190.0));

        // a tall one by the slot height
        let slot = Speaker::Cyclops.portrait_slot(vec2(100.0, 980.0), SCREEN);
        assert_eq!((slot.w, slot.h), (50.0, 490.0));
        assert_eq!(slot.x, 860.0);
        assert_eq!(slot.y + slot.h, 500.0);
    }

    #[test]
    fn empty_portrait_has_no_area() {
        let slot = Speaker::SirenB.portrait_slot(Vec2::ZERO, SCREEN);
        assert_eq!((slot.w, slot.h), (0.0, 0.0));
    }
}
