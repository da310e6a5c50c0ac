/*!
 * Quality measurement for translations.
 *
 * - **BLEU**: n-gram overlap between a translation and a reference
 */

pub mod bleu;

pub use bleu::sentence_bleu;
