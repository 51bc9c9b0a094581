mod layer_activation;
mod layer_norm;
