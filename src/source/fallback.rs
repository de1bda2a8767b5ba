use rand::Rng;

use crate::quiz::question::{Difficulty, Question};
use crate::source::sanitize::clean;
use crate::source::shuffle::shuffle;

struct BankEntry {
    id: &'static str,
    text: &'static str,
    correct: &'static str,
    incorrect: [&'static str; 3],
    category: &'static str,
}

const EASY: &[BankEntry] = &[
    BankEntry {
        id: "fallback-1",
        text: "What is the capital of France?",
        correct: "Paris",
        incorrect: ["London", "Berlin", "Madrid"],
        category: "Geography",
    },
    BankEntry {
        id: "fallback-2",
        text: "Which planet is known as the Red Planet?",
        correct: "Mars",
        incorrect: ["Venus", "Jupiter", "Saturn"],
        category: "Science",
    },
    BankEntry {
        id: "fallback-3",
        text: "What is 2 + 2?",
        correct: "4",
        incorrect: ["3", "5", "6"],
        category: "Mathematics",
    },
    BankEntry {
        id: "fallback-4",
        text: "Which ocean is the largest?",
        correct: "Pacific",
        incorrect: ["Atlantic", "Indian", "Arctic"],
        category: "Geography",
    },
    BankEntry {
        id: "fallback-5",
        text: "What is the chemical symbol for water?",
        correct: "H2O",
        incorrect: ["CO2", "NaCl", "O2"],
        category: "Science",
    },
];

const MEDIUM: &[BankEntry] = &[
    BankEntry {
        id: "fallback-6",
        text: "Who painted the Mona Lisa?",
        correct: "Leonardo da Vinci",
        incorrect: ["Vincent van Gogh", "Pablo Picasso", "Michelangelo"],
        category: "Art",
    },
    BankEntry {
        id: "fallback-7",
        text: "What is the smallest country in the world?",
        correct: "Vatican City",
        incorrect: ["Monaco", "San Marino", "Liechtenstein"],
        category: "Geography",
    },
    BankEntry {
        id: "fallback-8",
        text: "Which programming language was created by Brendan Eich?",
        correct: "JavaScript",
        incorrect: ["Python", "Java", "C++"],
        category: "Technology",
    },
    BankEntry {
        id: "fallback-9",
        text: "What is the speed of light in vacuum?",
        correct: "299,792,458 m/s",
        incorrect: ["300,000,000 m/s", "299,000,000 m/s", "301,000,000 m/s"],
        category: "Science",
    },
    BankEntry {
        id: "fallback-10",
        text: "Which year did World War II end?",
        correct: "1945",
        incorrect: ["1944", "1946", "1947"],
        category: "History",
    },
];

const HARD: &[BankEntry] = &[
    BankEntry {
        id: "fallback-11",
        text: "What is the Heisenberg Uncertainty Principle?",
        correct: "You cannot simultaneously know the exact position and momentum of a particle",
        incorrect: [
            "Energy cannot be created or destroyed",
            "Light behaves as both wave and particle",
            "Matter and energy are equivalent",
        ],
        category: "Science",
    },
    BankEntry {
        id: "fallback-12",
        text: "Which algorithm is used for finding the shortest path in a graph?",
        correct: "Dijkstra's Algorithm",
        incorrect: ["Bubble Sort", "Binary Search", "Quick Sort"],
        category: "Computer Science",
    },
    BankEntry {
        id: "fallback-13",
        text: "What is the time complexity of merge sort?",
        correct: "O(n log n)",
        incorrect: ["O(n)", "O(n\u{b2})", "O(log n)"],
        category: "Computer Science",
    },
    BankEntry {
        id: "fallback-14",
        text: "Which philosopher wrote \"Being and Time\"?",
        correct: "Martin Heidegger",
        incorrect: ["Jean-Paul Sartre", "Friedrich Nietzsche", "Immanuel Kant"],
        category: "Philosophy",
    },
    BankEntry {
        id: "fallback-15",
        text: "What is the derivative of e^x?",
        correct: "e^x",
        incorrect: ["x * e^x", "e^(x-1)", "ln(x)"],
        category: "Mathematics",
    },
];

fn bank(difficulty: Difficulty) -> &'static [BankEntry] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    }
}

pub fn available(difficulty: Difficulty) -> usize {
    bank(difficulty).len()
}

/// The first `min(count, available)` bundled questions for `difficulty`,
/// question text run through `clean` and answers shuffled.
pub fn fallback_questions<R: Rng + ?Sized>(
    difficulty: Difficulty,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    bank(difficulty)
        .iter()
        .take(count)
        .map(|entry| {
            let mut answers: Vec<String> = std::iter::once(entry.correct)
                .chain(entry.incorrect)
                .map(str::to_string)
                .collect();
            shuffle(&mut answers, rng);
            Question {
                id: entry.id.to_string(),
                text: clean(entry.text),
                answers,
                correct_answer: entry.correct.to_string(),
                difficulty,
                category: entry.category.to_string(),
            }
        })
        .collect()
}
