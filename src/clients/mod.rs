pub mod entrez;
