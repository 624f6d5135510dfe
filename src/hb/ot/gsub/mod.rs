//! GSUB subtable application.

mod alternate;
mod ligature;
mod multiple;
mod reverse_chain;
mod single;
