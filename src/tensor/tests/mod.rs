mod new;
mod ops;
